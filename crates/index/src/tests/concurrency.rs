//! Concurrent insert/search/reset against one shared index.

use crate::{DocumentRecord, SharedIndex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Unit vector at `degrees`, recorded under an id that encodes the angle.
fn angled(degrees: u32) -> (Vec<f32>, DocumentRecord) {
    let radians = (degrees as f32).to_radians();
    (
        vec![radians.cos(), radians.sin()],
        DocumentRecord::new(format!("deg-{}", degrees)),
    )
}

fn degrees_of(id: &str) -> f32 {
    id.trim_start_matches("deg-").parse::<u32>().unwrap() as f32
}

#[test]
fn test_searches_never_see_unpaired_records() {
    let index = SharedIndex::new();
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let index = index.clone();
            thread::spawn(move || {
                for round in 0..50u32 {
                    let (vectors, records): (Vec<_>, Vec<_>) = (0..8)
                        .map(|i| angled((w * 90 + round * 8 + i) % 360))
                        .unzip();
                    index.insert(vectors, records).unwrap();
                    if w == 0 && round % 10 == 9 {
                        index.reset();
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = index.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let hits = index.search(&[1.0, 0.0], 16).unwrap();
                    for hit in &hits {
                        // A record paired with the wrong vector would score
                        // differently from the angle in its id.
                        let expected = degrees_of(&hit.id).to_radians().cos();
                        assert!((hit.score - expected).abs() < 1e-4);
                    }
                    for pair in hits.windows(2) {
                        assert!(pair[0].score >= pair[1].score);
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }

    let stats = index.stats();
    assert_eq!(stats.documents, index.search(&[1.0, 0.0], 10_000).unwrap().len());
}
