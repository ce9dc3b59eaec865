//! Benchmarks for active-section resolution.
//!
//! Run with: cargo bench -p terrasite-widgets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use terrasite_core::event::NodeId;
use terrasite_core::layout::{NavLinkRecord, SectionRecord};
use terrasite_widgets::active_section::{ActiveSectionTracker, current_section};

fn make_page(n: usize) -> (Vec<SectionRecord>, Vec<NavLinkRecord>) {
    let sections: Vec<SectionRecord> = (0..n)
        .map(|i| SectionRecord::new(format!("s{i}"), i as f64 * 600.0, 600.0))
        .collect();
    let mut links = vec![NavLinkRecord::new(NodeId(0), "index.html")];
    links.extend(
        sections
            .iter()
            .enumerate()
            .map(|(i, s)| NavLinkRecord::new(NodeId(i as u32 + 1), s.fragment())),
    );
    (sections, links)
}

fn bench_current_section(c: &mut Criterion) {
    let mut group = c.benchmark_group("active_section/current_section");
    for n in [4, 16, 64] {
        let (sections, _) = make_page(n);
        let bottom = n as f64 * 600.0;
        group.bench_with_input(BenchmarkId::new("bottom", n), &sections, |b, sections| {
            b.iter(|| black_box(current_section(sections, bottom, 100.0)))
        });
    }
    group.finish();
}

fn bench_tracker_scroll_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("active_section/tracker_sweep");
    for n in [4, 16, 64] {
        let (sections, links) = make_page(n);
        group.bench_with_input(BenchmarkId::new("sweep", n), &n, |b, &n| {
            b.iter(|| {
                let mut tracker = ActiveSectionTracker::default();
                let mut y = 0.0;
                while y < n as f64 * 600.0 {
                    black_box(tracker.update(&sections, &links, y));
                    y += 37.0;
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_current_section, bench_tracker_scroll_sweep);
criterion_main!(benches);
