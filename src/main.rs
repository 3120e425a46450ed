use bevy::prelude::*;
use bevy::window::WindowPlugin;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::gizmos::config::{GizmoConfigStore, DefaultGizmoConfigGroup};
use bevy_egui::EguiPlugin;

pub mod config;
pub mod systems;


// import modules here
use systems::FramePlugin;
use systems::landmarks::source::DetectorPlugin;
use systems::overlay::OverlayPlugin;
use systems::points::PointSynthesisPlugin;
use systems::ui::UIPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Voronoi Mirror".into(),
                mode: bevy::window::WindowMode::Windowed,
                resolution: bevy::window::WindowResolution::new(config::WINDOW_WIDTH, config::WINDOW_HEIGHT),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())

        // my custom plugins
        .add_plugins(FramePlugin)
        .add_plugins(DetectorPlugin)
        .add_plugins(PointSynthesisPlugin)
        .add_plugins(OverlayPlugin)
        .add_plugins(UIPlugin)

        .insert_resource(ClearColor(Color::BLACK))
        .add_systems(Startup, (start, setup_gizmos))
        .add_systems(Update, handle_exit)
        .run()
}

fn setup_gizmos(
    mut config_store: ResMut<GizmoConfigStore>
) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = 1.0; // thin cell outlines
}

// application entry point here
fn start(
    mut commands: Commands
) {
    commands.spawn(Camera2d);
    info!("voronoi mirror started, TAB toggles points, T toggles trails");
}

// application exit
fn handle_exit(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
