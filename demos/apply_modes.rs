//! Example: drive the controller through a day of mode changes.
//!
//! Run with: `cargo run --example apply_modes`

use std::sync::Arc;

use mdnie_core::{
    ControllerOptions, MdnieController, MdnieError, MockLink, PowerEvent, builtin_store,
};

fn main() -> Result<(), MdnieError> {
    // Initialize logging (optional)
    env_logger::init();

    // A mock link stands in for the panel's register interface.
    let link = Arc::new(MockLink::new());
    let controller = MdnieController::new(link.clone(), builtin_store(), ControllerOptions::default());

    println!("boot: applied {} sequences", link.writes().len());

    // Morning reading: e-book scenario, auto rendering.
    controller.set_mode(4)?;
    controller.set_scenario(9)?;
    println!("e-book white point: {:?}", controller.white_point());

    // Step outside; the light sensor pushes the panel into the
    // high-brightness tier.
    controller.set_lux(55_000)?;
    println!("outdoor tier: {:?}", controller.hbm());

    // Back inside.
    controller.set_lux(300)?;

    // Compare the catalog against what the panel actually holds.
    let report = controller.readback()?;
    print!("{}", report);
    println!("mismatched bytes: {}", report.mismatch_count());

    // Screen off: setters become no-ops until the next unblank.
    controller.on_power_event(PowerEvent::PowerDown);
    controller.set_scenario(0)?;
    controller.on_power_event(PowerEvent::Unblank);

    println!("total sequences written: {}", link.writes().len());
    Ok(())
}
