use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rpg_roster_core::{
    create_player, filter_players, sort_and_page, MemoryStore, PageRequest, PlayerFields,
    PlayerFilter, PlayerOrder, PlayerRecord, PlayerStore, Race,
};

const BIRTHDAY_2010: i64 = 1_262_304_000_000;
const DAY_MILLIS: i64 = 86_400_000;

fn mk_fields(index: usize) -> PlayerFields {
    let races = ["HUMAN", "DWARF", "ELF", "GIANT", "ORC", "TROLL", "HOBBIT"];
    let professions = ["WARRIOR", "ROGUE", "SORCERER", "CLERIC"];
    let offset = i64::try_from(index).unwrap_or(i64::MAX);

    PlayerFields {
        name: Some(format!("Player{}", index % 10_000)),
        title: Some(format!("Bench title {}", index % 17)),
        race: Some(races[index % races.len()].to_string()),
        profession: Some(professions[index % professions.len()].to_string()),
        birthday: Some(BIRTHDAY_2010 + (offset % 3_650) * DAY_MILLIS),
        experience: Some((offset * 7_919) % 10_000_000),
        banned: Some(index % 5 == 0),
    }
}

fn seeded_records(count: usize) -> Vec<PlayerRecord> {
    let mut store = MemoryStore::default();
    for index in 0..count {
        if let Err(err) = create_player(&mut store, mk_fields(index)) {
            panic!("benchmark fixture player {index} is invalid: {err}");
        }
    }
    match store.fetch_all() {
        Ok(records) => records,
        Err(err) => panic!("benchmark fixture store scan failed: {err}"),
    }
}

fn bench_filter_sort_page(c: &mut Criterion) {
    let records = seeded_records(10_000);
    let filter = PlayerFilter {
        name: Some("Player1".to_string()),
        race: Some(Race::Elf),
        banned: Some(false),
        min_level: Some(10),
        ..PlayerFilter::default()
    };
    let page = match PageRequest::new(2, 20) {
        Ok(page) => page,
        Err(err) => panic!("benchmark page request is invalid: {err}"),
    };

    c.bench_function("filter_sort_page_10000_players", |b| {
        b.iter(|| {
            let filtered = filter_players(black_box(&records), black_box(&filter));
            sort_and_page(&filtered, page, PlayerOrder::Experience)
        });
    });

    c.bench_function("sort_page_by_name_10000_players", |b| {
        b.iter(|| sort_and_page(black_box(&records), page, PlayerOrder::Name));
    });
}

criterion_group!(pipeline_benches, bench_filter_sort_page);
criterion_main!(pipeline_benches);
