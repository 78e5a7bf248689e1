use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stayfinder::filter::FilterCriteria;
use stayfinder::model::{Amenities, Location, Venue};

fn build_venues(count: usize) -> Vec<Venue> {
    (0..count)
        .map(|i| Venue {
            id: format!("venue{}", i),
            name: format!("Venue {}", i),
            description: None,
            media: Vec::new(),
            price: 50.0 + (i % 40) as f64 * 10.0,
            max_guests: 1 + (i % 8) as u32,
            rating: (i % 6) as f64,
            meta: Amenities {
                wifi: i % 2 == 0,
                parking: i % 3 == 0,
                breakfast: i % 5 == 0,
                pets: i % 7 == 0,
            },
            location: if i % 4 == 0 {
                None
            } else {
                Some(Location {
                    city: Some(["Bergen", "Oslo", "Lisbon"][i % 3].to_string()),
                    country: Some(["Norway", "Norway", "Portugal"][i % 3].to_string()),
                    continent: Some("Europe".to_string()),
                })
            },
            owner: None,
            bookings: Vec::new(),
        })
        .collect()
}

// Benchmark for the client-side filter engine over fetched pages
pub fn filter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("venue_filter");

    let criteria = FilterCriteria {
        country: "nor".to_string(),
        min_price: Some(80.0),
        max_price: Some(300.0),
        min_rating: Some(2.0),
        wifi: true,
        ..FilterCriteria::default()
    };

    for size in [100, 1_000, 10_000].iter() {
        let venues = build_venues(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(criteria.apply(black_box(&venues)).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, filter_benchmark);
criterion_main!(benches);
