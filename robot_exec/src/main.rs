//! Main robot executable entry point.
//!
//! # Architecture
//!
//! Runs one simulated match against the simulated equipment:
//!
//!     - Initialise the session, logging and parameters
//!     - Build the equipment and subsystems, configure the hardware
//!     - For each phase (disabled, autonomous, teleop, disabled):
//!         - Enter the phase in the mode driver
//!         - Main loop, once per cycle:
//!             - Scheduler tick (commands then subsystem periodics)
//!             - Step the simulated plants and match clock
//!             - Telemetry archiving at 1 Hz
//!             - Cycle pacing

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::thread;
use std::time::{Duration, Instant};

use color_eyre::{eyre::WrapErr, Result};
use log::{info, warn};

use eqpt_if::TelemetrySink;
use robot_lib::{
    arm_ctrl,
    auto::AutoParams,
    balance_ctrl,
    params::ExecParams,
    robot::{Robot, RobotMode, RobotParams},
    sim::SimEquipment,
    subsystems::{Arm, Drive, Grabber},
    systems::Systems,
    tm::TmRecord,
    CYCLE_PERIOD_S,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::{self, Session},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of cycles between telemetry snapshots.
const TM_PERIOD_CYCLES: u64 = (1.0 / CYCLE_PERIOD_S) as u64;

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    let session = Session::new("robot_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Robot Executable\n");
    info!("Running on: {}", host::platform());
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        util::params::load("robot_exec.toml").wrap_err("Could not load exec params")?;
    let arm_params: arm_ctrl::Params =
        util::params::load("arm_ctrl.toml").wrap_err("Could not load arm control params")?;
    let balance_params: balance_ctrl::Params = util::params::load("balance_ctrl.toml")
        .wrap_err("Could not load balance control params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE EQUIPMENT ----

    info!("Initialising subsystems...");

    let mut eqpt = SimEquipment::new(&exec_params.sim);

    let mut arm = Arm::new(
        Box::new(eqpt.arm_motor.clone()),
        Box::new(eqpt.arm.encoder()),
        arm_params,
    )
    .wrap_err("Failed to create the Arm")?;
    arm.initialize(exec_params.init_retry_attempts)
        .wrap_err("Failed to initialise the arm hardware")?;
    arm.burn_flash()
        .wrap_err("Failed to burn the arm motor configuration")?;
    info!("Arm init complete");

    let mut grabber = Grabber::new(
        Box::new(eqpt.grabber_motor.clone()),
        exec_params.grabber.clone(),
    );
    grabber
        .init_hardware(exec_params.init_retry_attempts)
        .wrap_err("Failed to initialise the grabber hardware")?;
    grabber
        .burn_flash()
        .wrap_err("Failed to burn the grabber motor configuration")?;
    info!("Grabber init complete");

    let drive = Drive::new(Box::new(eqpt.swerve.clone()), Box::new(eqpt.gyro.clone()));
    info!("Drive init complete");

    let systems = Systems::new(arm, drive, grabber, Box::new(eqpt.clock.clone()));

    let mut robot = Robot::new(
        systems,
        &RobotParams {
            auto_routine: exec_params.auto_routine,
            auto: AutoParams {
                eject_s: exec_params.eject_s,
                balance: balance_params,
            },
            turning_motor_idle_mode: exec_params.turning_motor_idle_mode,
        },
    )
    .wrap_err("Failed to initialise the Robot")?;

    info!("Subsystem initialisation complete\n");

    // ---- MAIN LOOP ----

    let phases = [
        (RobotMode::Disabled, exec_params.disabled_s),
        (RobotMode::Autonomous, exec_params.autonomous_s),
        (RobotMode::Teleop, exec_params.teleop_s),
        (RobotMode::Disabled, exec_params.disabled_s),
    ];

    let mut num_cycles: u64 = 0;
    let mut num_consec_cycle_overruns: u64 = 0;

    info!("Begining main loop\n");

    for &(mode, duration_s) in phases.iter() {
        // The match clock only runs in the enabled periods
        let remaining_s = match mode {
            RobotMode::Disabled => 0.0,
            _ => duration_s,
        };
        eqpt.clock.set_remaining(remaining_s);
        robot.set_mode(mode);

        let phase_cycles = (duration_s / CYCLE_PERIOD_S).round() as u64;

        for _ in 0..phase_cycles {
            let cycle_start_instant = Instant::now();

            // ---- CONTROL PROCESSING ----

            robot.tick();

            // ---- SIMULATION ----

            eqpt.step(CYCLE_PERIOD_S);

            // ---- TELEMETRY ----

            if num_cycles % TM_PERIOD_CYCLES == 0 {
                let mut tm = TmRecord::default();
                tm.time_s = session::get_elapsed_seconds();
                robot.report(&mut tm);
                tm.put_number("Sim/Robot Position (m)", eqpt.station.robot_pos_m());
                tm.put_number("Sim/Station Tilt (deg)", eqpt.station.tilt_deg());

                session.save(format!("tm/{:08}.json", num_cycles), tm);
            }

            // ---- CYCLE MANAGEMENT ----

            num_cycles += 1;

            if !exec_params.realtime {
                continue;
            }

            let cycle_dur = Instant::now() - cycle_start_instant;

            match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
                Some(d) => {
                    num_consec_cycle_overruns = 0;
                    thread::sleep(d);
                }
                None => {
                    num_consec_cycle_overruns += 1;
                    warn!(
                        "Cycle overran by {:.06} s ({} consecutive)",
                        cycle_dur.as_secs_f64() - CYCLE_PERIOD_S,
                        num_consec_cycle_overruns
                    );
                }
            }
        }
    }

    // ---- SHUTDOWN ----

    info!(
        "Match complete after {} cycles, charge station balanced: {}",
        num_cycles,
        eqpt.station.is_balanced()
    );

    session.exit();

    info!("End of execution");

    Ok(())
}
