use criterion::{Criterion, black_box, criterion_group, criterion_main};

use reel::carousel::{CarouselController, CarouselOptions, CarouselRegistry, PointerKind};
use reel::deck::parse_deck;

fn deck_json(rows: usize, slides: usize) -> String {
    let rows = (0..rows)
        .map(|r| {
            let slides = (0..slides)
                .map(|s| format!(r#"{{ "caption": "Slide {s}", "image": "img/{r}-{s}.png" }}"#))
                .collect::<Vec<_>>()
                .join(",");
            format!(r#"{{ "id": "row-{r}", "title": "Row {r}", "slides": [ {slides} ] }}"#)
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{ "title": "Bench", "rows": [ {rows} ] }}"#)
}

fn bench_parse_deck(c: &mut Criterion) {
    let json = deck_json(50, 12);
    c.bench_function("parse_deck_50x12", |b| {
        b.iter(|| parse_deck(black_box(&json)).unwrap());
    });
}

fn bench_drag_sequence(c: &mut Criterion) {
    c.bench_function("drag_move_snap", |b| {
        b.iter(|| {
            let mut controller = CarouselController::new(20, CarouselOptions::default());
            controller.handle_drag_start(200, PointerKind::Mouse);
            for x in (0..200).rev().step_by(4) {
                controller.handle_drag_move(black_box(x));
            }
            controller.handle_drag_end(0);
            black_box(controller.current_index())
        });
    });
}

fn bench_glide_ticks(c: &mut Criterion) {
    c.bench_function("glide_to_far_slide", |b| {
        b.iter(|| {
            let mut controller = CarouselController::new(20, CarouselOptions::default());
            controller.go_to_slide(black_box(19), 0);
            let mut now = 0_u64;
            while controller.tick(now) {
                now += 16;
            }
            black_box(controller.scroll_offset())
        });
    });
}

fn bench_registry_rescan(c: &mut Criterion) {
    let deck = parse_deck(&deck_json(100, 8)).unwrap();
    c.bench_function("registry_rescan_100_bound", |b| {
        let mut registry = CarouselRegistry::new();
        registry.scan(&deck, |_| CarouselOptions::default());
        b.iter(|| {
            let discovered = registry.scan(black_box(&deck), |_| CarouselOptions::default());
            black_box(discovered.len())
        });
    });
}

criterion_group!(
    benches,
    bench_parse_deck,
    bench_drag_sequence,
    bench_glide_ticks,
    bench_registry_rescan
);
criterion_main!(benches);
