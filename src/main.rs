use osprey_arm::Config;
use std::error::Error;
use tracing::{error, info};

use osprey_arm::adapters::outbound::{ConsoleTrajectoryDisplay, SimKinematicBackend};
use osprey_arm::application::MotionService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting osprey-arm motion service");

    // Load configuration
    let config = Config::from_file("config.toml").await?;
    info!(
        point_n_step = config.planning.point_n_step,
        eef_step = config.planning.eef_step,
        jump_threshold = config.planning.jump_threshold,
        planner_id = %config.planning.planner_id,
        "Configuration loaded"
    );

    // Wire the simulated backend and console display into the service
    let backend = Box::new(SimKinematicBackend::new());
    let display = Box::new(ConsoleTrajectoryDisplay);
    let service = MotionService::new(backend, display, &config.planning);

    // Refuse to serve requests against a partially initialized backend
    if let Err(e) = service.initialize().await {
        error!(error = %e, "Planning backend unavailable, shutting down");
        return Err(Box::new(e) as Box<dyn Error>);
    }

    info!("Motion service started successfully");

    // Demo sequence: plan to a random pose, visualize, execute, then run a
    // short random cartesian path
    let planned = service.plan_random_pose().await;
    info!(planned, "plan_random_pose");
    if planned {
        let shown = service.visualize_plan().await;
        info!(shown, "visualize_plan");
        let executed = service.execute_plan().await;
        info!(executed, "execute_plan");
    }

    let planned = service.plan_random_path(3).await;
    info!(planned, "plan_random_path");
    if planned {
        let executed = service.execute_plan().await;
        info!(executed, "execute_plan");
    }

    info!("Shutting down osprey-arm motion service");
    Ok(())
}
