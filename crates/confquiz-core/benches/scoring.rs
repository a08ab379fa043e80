use criterion::{black_box, criterion_group, criterion_main, Criterion};

use confquiz_core::aggregate::{average_confidence, calibration, score, Summary};
use confquiz_core::model::{AnswerRecord, Confidence};

fn make_answers(n: usize) -> Vec<AnswerRecord> {
    (0..n)
        .map(|i| AnswerRecord {
            question: format!("What is {i} + {i}?"),
            answer: (i * 2).to_string(),
            not_selected_answers: vec![(i * 2 + 1).to_string(), (i * 2 + 2).to_string()],
            is_correct: i % 3 != 0,
            confidence: Confidence::try_from((i % 5) as u8 + 1).unwrap(),
            correct_answer: (i * 2).to_string(),
            is_generated: Some(i % 2 == 0),
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for n in [20usize, 1_000] {
        let answers = make_answers(n);
        group.bench_function(format!("score/{n}"), |b| b.iter(|| score(black_box(&answers))));
        group.bench_function(format!("average_confidence/{n}"), |b| {
            b.iter(|| average_confidence(black_box(&answers)))
        });
        group.bench_function(format!("summary/{n}"), |b| {
            b.iter(|| Summary::compute(black_box(&answers), n))
        });
        group.bench_function(format!("calibration/{n}"), |b| {
            b.iter(|| calibration(black_box(&answers)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
