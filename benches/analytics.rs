use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_core::core::{
    charts::{bar_entries, pie_slices, trend_points},
    AnalyticsEngine, PeriodKind, PeriodRange,
};
use expense_core::domain::{Category, Expense, NewExpense};

fn build_records(count: usize, start: NaiveDate) -> Vec<Expense> {
    let categories: Vec<Category> = Category::all().collect();
    let created = Utc::now();
    (0..count)
        .map(|idx| {
            let day = start + Duration::days((idx % 365) as i64);
            let category = categories[idx % categories.len()];
            let amount = 20.0 + (idx % 250) as f64;
            Expense::from_new(NewExpense::new(amount, category, "bench", day), created)
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let reference = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
    let year = PeriodRange::for_kind(PeriodKind::Year, reference).expect("year range");
    let current = build_records(10_000, year.start);
    let previous = build_records(10_000, year.previous().expect("previous range").start);

    c.bench_function("analyze_year_10k", |b| {
        b.iter(|| AnalyticsEngine::analyze(black_box(&current), black_box(&previous)))
    });

    let snapshot = AnalyticsEngine::analyze(&current, &previous);
    c.bench_function("chart_shapes_year", |b| {
        b.iter(|| {
            let pie = pie_slices(black_box(&snapshot));
            let bars = bar_entries(black_box(&snapshot));
            let trend = trend_points(PeriodKind::Year, &year, black_box(&snapshot));
            (pie, bars, trend)
        })
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
