//! Rotation Board - headless inspector
//!
//! Loads the board the way the app would, prints every rotation record and
//! checks the free-rotation layouts.
//!
//! Usage:
//!   cargo run
//!   cargo run -- --formation 6-2 --store config/overrides.db
//!   cargo run -- --reset    # Forget saved edits for the formation

use bevy::log::LogPlugin;
use bevy::prelude::*;
use rotation_board::{
    BoardSettings, BoardStore, FormationData, ROTATIONS, RotationBoardPlugin, SEAT_COUNT,
    SelectionState, SettingsSession, Situation, TemplateCatalog, marker_views, validate_positions,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: rotation_board [--formation <id>] [--store <path>] [--reset]");
        return;
    }
    let reset = args.iter().any(|a| a == "--reset");

    let mut settings = BoardSettings::load();
    settings.apply_args(&args[1..]);

    let mut app = App::new();
    app.add_plugins((LogPlugin::default(), RotationBoardPlugin::new(settings)));

    let world = app.world_mut();
    world.resource_scope(|world, mut data: Mut<FormationData>| {
        if reset {
            world.resource_scope(|world, mut store: Mut<BoardStore>| {
                let catalog = world.resource::<TemplateCatalog>();
                let mut session = SettingsSession::default();
                session.factory_reset(&mut data, catalog, store.0.as_mut());
            });
            println!("Factory reset {}", data.formation);
        }
    });

    let data = world.resource::<FormationData>();
    let selection = world.resource::<SelectionState>();

    if data.is_empty() {
        println!("No rotation data for formation {}", data.formation.title());
        std::process::exit(1);
    }

    print!("{}", data);

    println!("\nCourt order ({}):", Situation::Rotation.label());
    let mut invalid = 0;
    for rotation in ROTATIONS {
        let positions: [Vec3; SEAT_COUNT] = std::array::from_fn(|i| {
            data.get_position(Situation::Rotation, rotation, i + 1)
        });
        let ok = validate_positions(rotation, &positions);
        if !ok {
            invalid += 1;
        }
        println!("  Rotation {} ... {}", rotation, if ok { "OK" } else { "INVALID" });
    }

    let current = selection.current();
    println!(
        "\nStarting on rotation {} {}:",
        current.rotation,
        current.situation.label()
    );
    for marker in marker_views(data, current) {
        println!(
            "  {} {:<8} ({:.2}, {:.2})",
            marker.seat, marker.name, marker.position.x, marker.position.z
        );
    }

    if invalid > 0 {
        std::process::exit(1);
    }
}
