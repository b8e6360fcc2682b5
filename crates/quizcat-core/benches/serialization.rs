use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizcat_core::{
    catalogue_from_dict, Catalogue, EstimationQuestion, MultipleChoiceQuestion, RegexQuestion,
    Section,
};

/// Catalogue shaped like a real exam pool: every section holds
/// `per_section` questions of each of three kinds.
fn build_catalogue(sections: usize, per_section: usize) -> Catalogue {
    let mut c = Catalogue::new("bench", "Benchmark", Some("Generated catalogue".into()));
    for s in 0..sections {
        let mut section = Section::new(format!("sec{s}"), format!("Section {s}"));
        for i in 0..per_section {
            section.append_question(MultipleChoiceQuestion::new(
                format!("qa{i}"),
                "Question 1",
                "What??",
                "Foobar",
                vec!["no".into(), "no".into()],
            ));
            section.append_question(
                RegexQuestion::new(format!("qb{i}"), "Question 2", "Word starting with a?", "Affe", "[aA].*")
                    .unwrap(),
            );
            section.append_question(
                EstimationQuestion::new(format!("qc{i}"), "Question 3", "1 km in feet", 3280.84, Some(700.0))
                    .unwrap(),
            );
        }
        c.append_section(section);
    }
    c
}

fn bench_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump");
    group.sample_size(20);

    let small = build_catalogue(2, 25);
    let large = build_catalogue(12, 250);

    group.bench_function("150_questions", |b| {
        b.iter(|| serde_json::to_string(&black_box(&small).dict_dump().unwrap()).unwrap())
    });

    group.bench_function("9000_questions", |b| {
        b.iter(|| serde_json::to_string(&black_box(&large).dict_dump().unwrap()).unwrap())
    });

    group.finish();
}

fn bench_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore");
    group.sample_size(20);

    let small = serde_json::to_string(&build_catalogue(2, 25).dict_dump().unwrap()).unwrap();
    let large = serde_json::to_string(&build_catalogue(12, 250).dict_dump().unwrap()).unwrap();

    group.bench_function("150_questions", |b| {
        b.iter(|| {
            let value: serde_json::Value = serde_json::from_str(black_box(&small)).unwrap();
            catalogue_from_dict(&value).unwrap()
        })
    });

    group.bench_function("9000_questions", |b| {
        b.iter(|| {
            let value: serde_json::Value = serde_json::from_str(black_box(&large)).unwrap();
            catalogue_from_dict(&value).unwrap()
        })
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let catalogue = build_catalogue(12, 250);

    c.bench_function("lookup_last_question", |b| {
        b.iter(|| catalogue.get_question(black_box("sec11"), black_box("qc249")))
    });

    c.bench_function("lookup_section_by_title", |b| {
        b.iter(|| catalogue.get_section(None, black_box(Some("section 11"))))
    });
}

criterion_group!(benches, bench_dump, bench_restore, bench_lookup);
criterion_main!(benches);
