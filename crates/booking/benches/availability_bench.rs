use booking::{
    AvailabilityChecker, Booking, BookingRepository, Customer, InMemoryBookingRepository,
    NewBooking, OptionConfiguration, PaymentRecord, PriceTable, RentalPeriod,
    ResourceConfiguration,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn period(day: i64) -> RentalPeriod {
    let start = now() + Duration::days(day * 3);
    RentalPeriod::new(start, start + Duration::days(2), now()).unwrap()
}

fn seeded_repository(rt: &tokio::runtime::Runtime, count: i64) -> InMemoryBookingRepository {
    let repo = InMemoryBookingRepository::new();
    let prices = PriceTable::standard();
    rt.block_on(async {
        for day in 0..count {
            let booking = Booking::create(
                NewBooking {
                    resource: ResourceConfiguration::Small,
                    option: OptionConfiguration::None,
                    period: period(day),
                    customer: Customer::new("Bench", "bench@example.com", "5551234567", "Here")
                        .unwrap(),
                    payment: PaymentRecord::pending(None),
                },
                &prices,
                now(),
            )
            .unwrap();
            repo.insert(booking).await.unwrap();
        }
    });
    repo
}

fn bench_is_available(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let checker = AvailabilityChecker::new(seeded_repository(&rt, 1_000));
    let free = period(5_000);
    let taken = period(500);

    c.bench_function("availability/free_period_1k_bookings", |b| {
        b.iter(|| {
            rt.block_on(async {
                checker
                    .is_available(ResourceConfiguration::Small, &free)
                    .await
                    .unwrap()
            })
        });
    });

    c.bench_function("availability/taken_period_1k_bookings", |b| {
        b.iter(|| {
            rt.block_on(async {
                checker
                    .is_available(ResourceConfiguration::Small, &taken)
                    .await
                    .unwrap()
            })
        });
    });
}

fn bench_quote(c: &mut Criterion) {
    let prices = PriceTable::standard();

    c.bench_function("pricing/price", |b| {
        b.iter(|| {
            prices
                .price(ResourceConfiguration::Medium, OptionConfiguration::Premium)
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_is_available, bench_quote);
criterion_main!(benches);
