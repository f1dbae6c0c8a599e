use anyhow::Context;
use cert_packer::core::DryRun;
use cert_packer::report::console;
use cert_packer::utils::{logger, validation::Validate};
use cert_packer::{AllocationEngine, CliConfig, ConfiguredSource, PackerError, RunConfig};
use clap::Parser;

fn fail(e: &PackerError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn display_config_summary(config: &RunConfig) {
    println!("📋 Configuration Summary:");
    match &config.source.input {
        Some(path) => println!("  Source: CSV {}", path.display()),
        None => {
            let generator = &config.generator;
            println!(
                "  Source: {} merchants x {} orders, amounts {}..={}",
                generator.merchants,
                generator.orders_per_merchant,
                generator.min_amount,
                generator.max_amount
            );
            match generator.seed {
                Some(seed) => println!("  Seed: {}", seed),
                None => println!("  Seed: random"),
            }
        }
    }
    println!(
        "  Limit: {} (absolute cap {})",
        config.allocation.limit, config.allocation.absolute_cap
    );
    println!(
        "  Reserved certificates: {}",
        config.allocation.reserved_certificates
    );
    println!(
        "  Balancing band: {}..{} of target, clamp {}",
        config.allocation.balancing.low_water,
        config.allocation.balancing.high_water,
        config.allocation.balancing.overshoot_clamp
    );
    println!();
}

fn display_dry_run(dry: &DryRun) {
    println!("🔍 Dry Run Analysis:");
    println!("  Source: {}", dry.source);
    println!("  Orders: {}", dry.order_count);
    println!("  Total amount: ${:.2}", dry.total_amount);
    println!("  Effective limit: ${:.2}", dry.limit);
    println!("  Target certificates: {}", dry.plan.target);
    println!("  Main slots: {}", dry.plan.main_slots);
    println!("  Reserved for balancing: {}", dry.plan.reserved);
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.log_json);
    tracing::info!("🚀 Starting cert-packer");

    let config = cli.resolve().unwrap_or_else(|e| fail(&e));
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    if config.monitoring.enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = ConfiguredSource::from_config(&config);
    let mut engine = AllocationEngine::new_with_monitoring(
        source,
        config.allocation.clone(),
        config.report.sample_size,
        config.monitoring.enabled,
    );

    if cli.dry_run {
        display_config_summary(&config);
        let dry = engine.dry_run().unwrap_or_else(|e| fail(&e));
        display_dry_run(&dry);
        return Ok(());
    }

    let report = engine.run().unwrap_or_else(|e| fail(&e));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    console::render(&report, config.report.format, &mut out)
        .context("failed to write report to stdout")?;

    tracing::info!("✅ Allocation completed");
    Ok(())
}
