//! `hearth generate` command: fill this week and next for every profile.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use hearth_core::planner::calendar::target_mondays;
use hearth_core::store::PgStore;
use hearth_core::{GeneratorConfig, UnitOutcome, WeekGenerator};
use hearth_db::queries::profiles;

/// Run the generate command.
///
/// `today` defaults to the current date in the configured reference offset.
pub async fn run_generate(
    pool: &PgPool,
    config: GeneratorConfig,
    user: Option<Uuid>,
    today: Option<NaiveDate>,
) -> Result<()> {
    if let Some(user_id) = user {
        profiles::get_profile(pool, user_id)
            .await?
            .with_context(|| format!("profile {user_id} not found"))?;
    }

    let store = Arc::new(PgStore::new(pool.clone()));
    let generator = WeekGenerator::new(store.clone(), store, config);
    let today = today.unwrap_or_else(|| generator.today());
    let [current, next] = target_mondays(today);

    println!("Generating plans for the weeks of {current} and {next}");
    println!("  Workers: {}", generator.config().max_workers);

    // First signal stops scheduling new units, second force-exits.
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    let got_first_signal = Arc::new(AtomicBool::new(false));
    let got_first_clone = Arc::clone(&got_first_signal);

    tokio::spawn(async move {
        loop {
            tokio::signal::ctrl_c().await.ok();
            if got_first_clone.swap(true, Ordering::SeqCst) {
                eprintln!("\nForce exit.");
                std::process::exit(130);
            }
            eprintln!("\nFinishing running units (Ctrl+C again to force)...");
            tracing::info!("cancellation requested");
            cancel_clone.cancel();
        }
    });

    let reports = generator.run(today, user, cancel).await?;
    tracing::debug!(units = reports.len(), "generation run returned");

    if reports.is_empty() {
        println!("No profiles found.");
        return Ok(());
    }

    println!();
    let mut failed = 0;
    let mut skipped = 0;
    for report in &reports {
        let marker = match report.outcome {
            UnitOutcome::Generated(_) => "+",
            UnitOutcome::Failed { .. } => {
                failed += 1;
                "!"
            }
            UnitOutcome::Skipped => {
                skipped += 1;
                "."
            }
        };
        println!("  [{marker}] {report}");
    }

    let meals: u64 = reports
        .iter()
        .filter_map(|r| match r.outcome {
            UnitOutcome::Generated(c) => Some(c.meals_inserted),
            _ => None,
        })
        .sum();
    let blocks: u64 = reports
        .iter()
        .filter_map(|r| match r.outcome {
            UnitOutcome::Generated(c) => Some(c.blocks_inserted),
            _ => None,
        })
        .sum();
    println!();
    println!(
        "{} units: {meals} meals and {blocks} blocks inserted, {failed} failed, {skipped} skipped.",
        reports.len()
    );

    if skipped > 0 {
        println!("Interrupted. Re-run `hearth generate` to fill the remaining weeks.");
        std::process::exit(130);
    }
    if failed > 0 {
        bail!("{failed} of {} units failed", reports.len());
    }
    Ok(())
}
