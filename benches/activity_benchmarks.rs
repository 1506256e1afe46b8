use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use readwise::engine::activity::{
    ActivityLog, ActivityThresholds, DailyActivity, current_streak, longest_streak,
    month_calendar, month_summary,
};

/// Ten years of daily reading with a rest day every week or so.
fn make_log(days: u32) -> (ActivityLog, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let mut log = ActivityLog::new();
    let mut date = start;
    for i in 0..days {
        let minutes = if i % 8 == 7 { 0 } else { 10 + (i % 50) };
        log.insert(date, DailyActivity::new(minutes, u32::from(i % 5 == 0)));
        date = date.succ_opt().unwrap();
    }
    (log, date)
}

fn bench_month_summary(c: &mut Criterion) {
    let (log, _) = make_log(3650);

    c.bench_function("month_summary (10y log)", |b| {
        b.iter(|| month_summary(black_box(&log), 2020, 6))
    });
}

fn bench_classify(c: &mut Criterion) {
    let (log, _) = make_log(3650);
    let thresholds = ActivityThresholds::default();

    c.bench_function("classify (3650 days)", |b| {
        b.iter(|| {
            log.values()
                .map(|day| thresholds.classify(black_box(Some(day))))
                .max()
        })
    });
}

fn bench_calendar(c: &mut Criterion) {
    let (log, today) = make_log(3650);
    let thresholds = ActivityThresholds::default();

    c.bench_function("month_calendar (10y log)", |b| {
        b.iter(|| month_calendar(black_box(&log), 2020, 6, today, &thresholds))
    });
}

fn bench_streaks(c: &mut Criterion) {
    let (mut log, today) = make_log(3650);
    // Unbroken final stretch so current_streak walks back a long way
    let mut date = today;
    for _ in 0..365 {
        log.insert(date, DailyActivity::new(20, 0));
        date = date.pred_opt().unwrap();
    }

    c.bench_function("current_streak (365-day run)", |b| {
        b.iter(|| current_streak(black_box(&log), today))
    });
    c.bench_function("longest_streak (10y log)", |b| {
        b.iter(|| longest_streak(black_box(&log)))
    });
}

criterion_group!(
    benches,
    bench_month_summary,
    bench_classify,
    bench_calendar,
    bench_streaks
);
criterion_main!(benches);
