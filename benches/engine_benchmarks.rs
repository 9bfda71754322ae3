//! Performance benchmarks for the payroll derivation engine.
//!
//! This benchmark suite verifies that the engine meets performance targets:
//! - Direct calculation (no HTTP): < 50μs mean
//! - Single request through the router: < 1ms mean
//! - Batch of 100 requests: < 100ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use payroll_engine::api::{create_router, AppState};
use payroll_engine::config::ConfigLoader;
use payroll_engine::engine::Engine;
use payroll_engine::models::PayrollPayload;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with the loaded rule configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/pl").expect("Failed to load config");
    let engine = Engine::new(config).expect("Failed to build engine");
    AppState::new(engine)
}

/// A minimal payload: base salary only.
fn minimal_request() -> serde_json::Value {
    serde_json::json!({
        "employee": {
            "firstName": "Jan",
            "lastName": "Kowalski",
            "contractType": "EMPLOYMENT"
        },
        "position": { "baseRate": "6000" },
        "period": {
            "payPeriodStart": "2025-06-01",
            "payPeriodEnd": "2025-06-30",
            "normHoursInPeriod": "160"
        },
        "tax": {
            "taxYear": 2025,
            "taxFreeAllowanceMonthly": "300",
            "costsOfIncomeMonthly": "250",
            "taxThresholds": [
                { "threshold": "0", "rate": "0.12" },
                { "threshold": "10000", "rate": "0.32" }
            ]
        },
        "timesheet": { "hoursWorked": "160" }
    })
}

/// A payload exercising every input group and derivation step.
fn full_request(employee_index: usize) -> serde_json::Value {
    let mut request = minimal_request();
    request["employee"]["firstName"] = serde_json::json!(format!("emp_{:03}", employee_index));
    request["overtime"] = serde_json::json!({
        "overtime50h": "10",
        "overtime100h": "4",
        "overtimeNightH": "2",
        "overtimeLimitMonthly": "12"
    });
    request["travel"] = serde_json::json!({
        "travelDaysDomestic": "3",
        "dietRateDomestic": "45",
        "accommodationCost": "600",
        "privateCarKm": "120",
        "privateCarRatePerKm": "1.15"
    });
    request["allowances"] = serde_json::json!({
        "seniorityBonusPct": "10",
        "functionAllowance": "250",
        "medicalBenefitValue": "150"
    });
    request["deductions"] = serde_json::json!({
        "employeeSocialInsurancePct": "13.71",
        "healthInsurancePct": "9.00",
        "ppkEmployeePct": "2.00",
        "bailDeduction": "100",
        "otherDeductions": [{ "code": "UNION_FEE", "amount": "25.00" }]
    });
    request
}

/// Benchmark: direct engine calculation without the HTTP layer.
///
/// Target: < 50μs mean
fn bench_engine_direct(c: &mut Criterion) {
    let config = ConfigLoader::load("./config/pl").expect("Failed to load config");
    let engine = Engine::new(config).expect("Failed to build engine");
    let payload: PayrollPayload =
        serde_json::from_value(full_request(0)).expect("Failed to create payload");

    c.bench_function("engine_direct", |b| {
        b.iter(|| black_box(engine.calculate(black_box(&payload)).unwrap()))
    });
}

/// Benchmark: minimal request through the router.
///
/// Target: < 1ms mean
fn bench_minimal_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();
    let router = create_router(state);
    let body = minimal_request().to_string();

    c.bench_function("minimal_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/calculate")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: full payload through the router.
///
/// Target: < 1ms mean
fn bench_full_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();
    let router = create_router(state);
    let body = full_request(0).to_string();

    c.bench_function("full_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/calculate")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: batch of 100 requests.
///
/// Target: < 100ms mean
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    // Pre-create 100 different requests (vary employees for a realistic mix)
    let requests: Vec<String> = (0..100)
        .map(|i| {
            let mut request = full_request(i);
            if i % 3 == 0 {
                request["employee"]["contractType"] = serde_json::json!("COMMISSION");
                request["employee"]["isStudent"] = serde_json::json!(i % 6 == 0);
            }
            request.to_string()
        })
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &requests {
                let router = create_router(state.clone());
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/calculate")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body.clone()))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_engine_direct,
    bench_minimal_request,
    bench_full_request,
    bench_batch_100,
);
criterion_main!(benches);
