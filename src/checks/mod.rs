//! The DRC rule checks (spec.md §4.5) and the scheduler wiring that runs
//! them (spec.md §4.4).

pub mod annular_ring;
pub mod board_edge;
pub mod board_outline;
pub mod common;
pub mod copper_copper;
pub mod copper_hole;
pub mod device_clearance;
pub mod drill;
pub mod drill_drill;
pub mod drill_size;
pub mod keepout;
pub mod layers;
pub mod min_width;
pub mod pad_connection;
pub mod silkscreen_stopmask;
pub mod slots;
pub mod stale;
pub mod vias;

use crate::scheduler::Scheduler;

/// Builds a [`Scheduler`] with every rule check registered in its proper
/// bucket (spec.md §4.4's job classification).
#[must_use]
pub fn build_scheduler() -> Scheduler {
    let mut scheduler = Scheduler::new();

    // Stage-2: need `CalculatedData` populated by the Stage-1 per-layer jobs.
    scheduler.add_stage2("Checking copper-to-hole clearances", 20, |data, calc| {
        copper_hole::check(data, calc)
    });
    scheduler.add_stage2("Checking minimum PTH annular rings", 20, |data, calc| {
        annular_ring::check(data, calc)
    });

    // Independent: need neither stage's output, run alongside Stage-1.
    scheduler.add_independent("Checking copper-to-copper clearances", 20, |data, _calc| copper_copper::check(data));
    scheduler.add_independent("Checking copper-to-board-edge clearances", 10, |data, _calc| {
        board_edge::copper_board_edge(data)
    });
    scheduler.add_independent("Checking drill-to-drill clearances", 10, |data, _calc| drill_drill::check(data));
    scheduler.add_independent("Checking drill-to-board-edge clearances", 10, |data, _calc| {
        board_edge::drill_board_edge(data)
    });
    scheduler.add_independent("Checking silkscreen-to-stop-mask clearances", 10, |data, _calc| {
        silkscreen_stopmask::check(data)
    });
    scheduler.add_independent("Checking keepout zones", 15, |data, _calc| keepout::check(data));
    scheduler.add_independent("Checking pad connections", 10, |data, _calc| pad_connection::check(data));
    scheduler.add_independent("Checking device clearances", 15, |data, _calc| device_clearance::check(data));
    scheduler.add_independent("Checking board outline", 10, |data, _calc| board_outline::check(data));

    // Sequential: cheap single-pass scans, run on the orchestrator thread.
    scheduler.add_sequential("Checking minimum copper widths", 5, |data, _calc| min_width::min_copper_width(data));
    scheduler.add_sequential("Checking minimum silkscreen widths", 5, |data, _calc| {
        min_width::min_silkscreen_width(data)
    });
    scheduler.add_sequential("Checking minimum silkscreen text heights", 5, |data, _calc| {
        min_width::min_silkscreen_text_height(data)
    });
    scheduler.add_sequential("Checking minimum drill and slot sizes", 5, |data, _calc| drill_size::check(data));
    scheduler.add_sequential("Checking useless and forbidden vias", 5, |data, _calc| vias::check(data));
    scheduler.add_sequential("Checking allowed slot shapes", 5, |data, _calc| slots::check(data));
    scheduler.add_sequential("Checking used copper layers", 5, |data, _calc| layers::check(data));
    scheduler.add_sequential("Checking for unplaced, missing, and stale connections", 5, |data, _calc| {
        stale::check(data)
    });

    scheduler
}
