use at_people::config::PeopleSettings;
use at_people::editor::EditorPosition;
use at_people::people::{detect_trigger, get_suggestions, PeopleIndex};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn vault_paths(people: usize) -> Vec<String> {
    let mut paths = Vec::with_capacity(people * 2);
    for i in 0..people {
        paths.push(format!("People/Family{}/@Person {} Family{}.md", i % 97, i, i % 97));
        paths.push(format!("Daily/2024-01-{:02}/note-{}.md", i % 28 + 1, i));
    }
    paths
}

fn bench_rebuild(c: &mut Criterion) {
    let paths = vault_paths(10_000);
    let settings = PeopleSettings::default();
    c.bench_function("rebuild_10k_people", |b| {
        b.iter(|| PeopleIndex::rebuild(black_box(&paths), &settings))
    });
}

fn bench_suggestions(c: &mut Criterion) {
    let index = PeopleIndex::rebuild(&vault_paths(10_000), &PeopleSettings::default());
    c.bench_function("suggest_prefix_10k", |b| {
        b.iter(|| get_suggestions(black_box("person 12"), &index))
    });
}

fn bench_trigger(c: &mut Criterion) {
    let line = format!("{} @Person 42", "lorem ipsum ".repeat(200));
    let cursor = EditorPosition::new(0, line.chars().count());
    c.bench_function("detect_trigger_long_line", |b| {
        b.iter(|| detect_trigger(black_box(&line), cursor))
    });
}

criterion_group!(benches, bench_rebuild, bench_suggestions, bench_trigger);
criterion_main!(benches);
