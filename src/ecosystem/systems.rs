use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::Ecosystem;
use crate::organisms::TrophicType;

/// Run/pause state owned by the control layer
#[derive(Resource, Debug, Default)]
pub struct SimulationControl {
    pub paused: bool,
}

/// Space pauses, R resets, Escape quits
pub fn handle_controls(
    keys: Res<Input<KeyCode>>,
    mut control: ResMut<SimulationControl>,
    mut ecosystem: ResMut<Ecosystem>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit);
    }
    if keys.just_pressed(KeyCode::Space) {
        control.paused = !control.paused;
        info!("Simulation {}", if control.paused { "paused" } else { "resumed" });
    }
    if keys.just_pressed(KeyCode::R) {
        ecosystem.reset();
    }
}

/// One tick per frame unless paused
pub fn advance_simulation(control: Res<SimulationControl>, mut ecosystem: ResMut<Ecosystem>) {
    if !control.paused {
        ecosystem.tick();
    }
}

/// Draw every organism as a circle with an energy bar to its left
pub fn draw_organisms(ecosystem: Res<Ecosystem>, mut gizmos: Gizmos) {
    let middle = ecosystem.bounds().center();
    // World origin is the top-left corner with y pointing down; the camera is centered
    let to_screen = |p: Vec2| Vec2::new(p.x - middle.x, middle.y - p.y);

    for view in ecosystem.snapshot() {
        let center = to_screen(view.position);
        gizmos.circle_2d(center, view.size, body_color(view.trophic_type));

        let fraction = view.energy_ratio();
        let bar_x = center.x - view.size - 8.0;
        let bar_height = view.size * 2.0;
        let bottom = center.y - bar_height / 2.0;
        gizmos.line_2d(
            Vec2::new(bar_x, bottom),
            Vec2::new(bar_x, bottom + bar_height),
            Color::GRAY,
        );
        gizmos.line_2d(
            Vec2::new(bar_x, bottom),
            Vec2::new(bar_x, bottom + bar_height * fraction),
            energy_color(fraction),
        );
    }
}

pub fn update_window_title(
    ecosystem: Res<Ecosystem>,
    control: Res<SimulationControl>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.get_single_mut() else {
        return;
    };
    let suffix = if control.paused { " [paused]" } else { "" };
    window.title = format!("Ecosystem Simulator | {}{}", ecosystem.stats().summary(), suffix);
}

fn body_color(trophic_type: TrophicType) -> Color {
    match trophic_type {
        TrophicType::Producer => Color::GREEN,
        TrophicType::Herbivore => Color::BLUE,
        TrophicType::Carnivore => Color::RED,
    }
}

fn energy_color(fraction: f32) -> Color {
    if fraction > 0.5 {
        Color::GREEN
    } else if fraction > 0.2 {
        Color::YELLOW
    } else {
        Color::RED
    }
}
