use criterion::{black_box, criterion_group, criterion_main, Criterion};
use listing_core::{
    address::{format_address, AddressParts},
    currency::{display_price, CurrencyCode, Price, PriceList},
    localized::{Language, LocalizedText},
    map::{cluster_markers, Coordinates, MapMarker},
};

fn sample_prices() -> PriceList {
    PriceList::from(vec![
        Price::new(8_450_000.0, "TRY"),
        Price::new(265_000.0, "USD"),
        Price::new(243_500.75, "EUR"),
    ])
}

fn sample_markers(count: usize) -> Vec<MapMarker> {
    (0..count)
        .map(|idx| MapMarker {
            id: format!("listing-{idx}"),
            coordinates: Coordinates::new(
                36.0 + (idx % 97) as f64 * 0.01,
                30.0 + (idx % 89) as f64 * 0.02,
            ),
            label: String::new(),
        })
        .collect()
}

fn bench_price_display(c: &mut Criterion) {
    let prices = sample_prices();
    let codes = ["USD", "EUR", "TRY", "RUB"].map(CurrencyCode::new);

    c.bench_function("display_price_4_currencies", |b| {
        b.iter(|| {
            for code in &codes {
                black_box(display_price(black_box(&prices), code));
            }
        })
    });
}

fn bench_address(c: &mut Criterion) {
    let parts = AddressParts {
        state: Some(LocalizedText::new("Antalya", "Анталья")),
        city: Some(LocalizedText::new("Alanya", "")),
        street: Some(LocalizedText::new("Ataturk Blvd", "бульвар Ататюрка")),
    };

    c.bench_function("format_address_ru", |b| {
        b.iter(|| format_address(black_box(&parts), Language::Ru))
    });
}

fn bench_clustering(c: &mut Criterion) {
    let markers = sample_markers(5_000);

    c.bench_function("cluster_markers_5k_zoom_8", |b| {
        b.iter(|| black_box(cluster_markers(black_box(&markers), 8)))
    });
}

criterion_group!(
    benches,
    bench_price_display,
    bench_address,
    bench_clustering
);
criterion_main!(benches);
