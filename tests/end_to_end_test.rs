use cert_packer::config::SourceConfig;
use cert_packer::report::console;
use cert_packer::{
    allocate, balance, AllocationConfig, AllocationEngine, BalancingPolicy, CapacityLimit,
    CertificateKind, ConfiguredSource, GeneratorConfig, IntegrityWarning, Order, ReportFormat,
    RunConfig,
};
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

fn units(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

#[test]
fn test_generated_run_end_to_end() {
    let config = RunConfig {
        generator: GeneratorConfig {
            merchants: 20,
            orders_per_merchant: 50,
            seed: Some(2024),
            ..GeneratorConfig::default()
        },
        allocation: AllocationConfig {
            limit: units(20_000),
            ..AllocationConfig::default()
        },
        ..RunConfig::default()
    };

    let source = ConfiguredSource::from_config(&config);
    let mut engine = AllocationEngine::new(source, config.allocation.clone(), 3);
    let report = engine.run().unwrap();

    assert_eq!(report.order_count, 1_000);
    assert_eq!(report.merchant_count, 20);
    assert_eq!(report.stats.total_amount, report.total_order_amount);
    assert!(report.warnings.is_empty());
    assert!(report.stats.max_amount <= units(20_000));
    assert!(report.main_certificates >= 1);
    assert_eq!(report.main_samples.len(), 3usize.min(report.main_certificates));
    assert!(report
        .balancing_samples
        .iter()
        .all(|s| s.kind == CertificateKind::Balancing));

    let mut out = Vec::new();
    console::render(&report, ReportFormat::Text, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Total orders: 1000"));
    assert!(text.contains("Merchants: 20"));
}

#[test]
fn test_same_seed_same_certificates() {
    let generator = GeneratorConfig {
        merchants: 10,
        orders_per_merchant: 40,
        seed: Some(7),
        ..GeneratorConfig::default()
    };
    let allocation_config = AllocationConfig {
        limit: units(10_000),
        ..AllocationConfig::default()
    };

    let run = || {
        let config = RunConfig {
            generator: generator.clone(),
            allocation: allocation_config.clone(),
            ..RunConfig::default()
        };
        let source = ConfiguredSource::from_config(&config);
        let orders = cert_packer::OrderSource::load(&source).unwrap();
        allocate(&orders, &allocation_config)
            .unwrap()
            .into_certificates()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_csv_run_end_to_end() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "id,amount,merchant_id").unwrap();
    for id in 1..=30 {
        writeln!(file, "{},{}.25,{}", id, id * 10, id % 3 + 1).unwrap();
    }

    let config = RunConfig {
        source: SourceConfig {
            input: Some(file.path().to_path_buf()),
        },
        allocation: AllocationConfig {
            limit: units(1_000),
            ..AllocationConfig::default()
        },
        ..RunConfig::default()
    };

    let source = ConfiguredSource::from_config(&config);
    let mut engine = AllocationEngine::new(source, config.allocation.clone(), 2);
    let report = engine.run().unwrap();

    assert_eq!(report.order_count, 30);
    assert_eq!(report.merchant_count, 3);
    // 10 * (1 + ... + 30) + 30 * 0.25
    assert_eq!(report.total_order_amount, Decimal::new(465_750, 2));
    assert_eq!(report.stats.total_amount, report.total_order_amount);

    let mut out = Vec::new();
    console::render(&report, ReportFormat::Json, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["order_count"], 30);
}

#[test]
fn test_orders_below_limit_make_one_certificate() {
    let orders: Vec<Order> = (1..=10)
        .map(|i| Order::new(i, Decimal::new(4_999_99, 2), 1))
        .collect();
    let allocation = allocate(
        &orders,
        &AllocationConfig {
            limit: units(500_000),
            ..AllocationConfig::default()
        },
    )
    .unwrap();

    assert_eq!(allocation.certificate_count(), 1);
    assert_eq!(allocation.main[0].len(), 10);
    assert!(allocation.balancing.is_empty());
}

#[test]
fn test_oversized_order_is_placed_alone_and_flagged() {
    let orders = vec![
        Order::new(1, units(600_000), 1),
        Order::new(2, units(1_000), 2),
        Order::new(3, units(2_000), 2),
    ];
    let allocation = allocate(&orders, &AllocationConfig::default()).unwrap();

    let holder = allocation
        .certificates()
        .find(|c| c.orders().iter().any(|o| o.id == 1))
        .unwrap();
    assert_eq!(holder.len(), 1);
    assert_eq!(holder.amount(), units(600_000));
    assert_eq!(allocation.order_count(), 3);
    assert!(allocation.warnings.contains(&IntegrityWarning::OverCapacityOrder {
        order_id: 1,
        amount: units(600_000),
        limit: units(500_000),
    }));
    assert!(allocation.warnings.iter().any(|w| matches!(
        w,
        IntegrityWarning::CertificateOverLimit { certificate_id, .. } if *certificate_id == holder.id()
    )));
}

#[test]
fn test_leftover_distribution_over_three_slots() {
    let leftover: Vec<Order> = [120, 70, 50, 30, 20, 10]
        .iter()
        .enumerate()
        .map(|(i, a)| Order::new(i as u64 + 1, units(*a), 1))
        .collect();
    let limit = CapacityLimit::new(units(150), units(500_000)).unwrap();

    let certs = balance(&leftover, limit, 3, 5, &BalancingPolicy::default());

    assert!(!certs.is_empty());
    assert!(certs.len() <= leftover.len());
    for cert in &certs {
        assert!(cert.amount() <= units(150));
    }
    let placed: usize = certs.iter().map(|c| c.len()).sum();
    assert_eq!(placed, leftover.len());
    assert_eq!(certs[0].id(), 5);
}
