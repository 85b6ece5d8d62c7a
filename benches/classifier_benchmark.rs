use criterion::{Criterion, black_box, criterion_group, criterion_main};
use simspec_harness::classifier::classify;
use simspec_harness::inference::mock_response;
use simspec_harness::questions::generate_question;
use simspec_harness::runner::PROMPTS;

fn benchmark_classify_and_question(c: &mut Criterion) {
    let responses: Vec<&str> = PROMPTS.iter().map(|p| mock_response(p)).collect();

    c.bench_function("classify_and_question", |b| {
        b.iter(|| {
            for response in &responses {
                let category = classify(black_box(response));
                black_box(generate_question(category));
            }
        })
    });
}

criterion_group!(benches, benchmark_classify_and_question);
criterion_main!(benches);
