use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    process::Output,
};

use bracket_pool::{
    bracket::{build_bracket, on_match_finalized},
    choices::team_choices,
    import::load_csv_reader,
    matches::MatchKey,
    scoring::{Weights, assign_tournament_values, user_score},
    store::Store,
};

const EAST_2019: &str = "March Madness 2019
Year,Round,Match,Team 1,Team 1 Seed,Team 2,Team 2 Seed,Tournament Value
2019,1,1,Duke,1,NC Central,16,
2019,1,2,VCU,8,UCF,9,
2019,1,3,Liberty,12,Mississippi St,5,
2019,1,4,Virginia Tech,4,Saint Louis,13,
2019,1,5,Maryland,6,Belmont,11,
2019,1,6,LSU,3,Yale,14,
2019,1,7,Louisville,7,Minnesota,10,
2019,1,8,Michigan St,2,Bradley,15,
";

fn key(round: u32, number: u32) -> MatchKey {
    MatchKey {
        year: 2019,
        round,
        number,
    }
}

#[test]
fn a_whole_pool_season() -> anyhow::Result<()> {
    let mut store = Store::default();
    let import = load_csv_reader(&mut store, Cursor::new(EAST_2019))?;
    assert_eq!(import.rows, 8);

    // Eight first round matches make a four round bracket.
    assert_eq!(store.rounds_of(2019).count(), 4);
    assert_eq!(store.match_count(2019, 4), 1);

    // Rebuilding after the import is a no-op.
    let before = store.clone();
    build_bracket(&mut store, 2019)?;
    assert_eq!(store, before);

    // Alice fills in her bracket before anything is played: her upstream
    // picks narrow the later rounds for her.
    let today = chrono::NaiveDate::from_ymd_opt(2019, 3, 18).unwrap_or_default();
    store.set_prediction("alice", key(1, 1), "NC Central", None, None, today)?;
    store.set_prediction("alice", key(1, 2), "VCU", None, None, today)?;

    assert_eq!(
        team_choices(&store, key(2, 1), "alice")?,
        ["NC Central", "VCU"]
    );

    // Bob has predicted nothing, so round 2 match 1 expands to the four
    // possible teams.
    assert_eq!(
        team_choices(&store, key(2, 1), "bob")?,
        ["Duke", "NC Central", "VCU", "UCF"]
    );

    store.set_prediction("bob", key(1, 1), "Duke", None, None, today)?;
    store.set_prediction("bob", key(1, 2), "VCU", None, None, today)?;

    // Results come in; the 16 seed springs the upset.
    for (number, victor) in [
        (1, "NC Central"),
        (2, "VCU"),
        (3, "Mississippi St"),
        (4, "Virginia Tech"),
        (5, "Maryland"),
        (6, "LSU"),
        (7, "Louisville"),
        (8, "Michigan St"),
    ] {
        store.record_result(key(1, number), None, None, victor)?;
        on_match_finalized(&mut store, key(1, number))?;
    }

    // Victors landed in the right slots of round 2.
    for (number, team1, team2) in [
        (1, "NC Central", "VCU"),
        (2, "Mississippi St", "Virginia Tech"),
        (3, "Maryland", "LSU"),
        (4, "Louisville", "Michigan St"),
    ] {
        let game = store.match_at(key(2, number));
        assert_eq!(game.and_then(|game| game.team1.as_deref()), Some(team1));
        assert_eq!(game.and_then(|game| game.team2.as_deref()), Some(team2));
    }

    // Round 3 is still empty; round 2 has no victors yet.
    assert_eq!(
        store.match_at(key(3, 1)).and_then(|game| game.team1.as_deref()),
        None
    );

    // One point per correct pick, no weighting.
    assert_eq!(user_score(&store, "alice", 2019), 2);
    assert_eq!(user_score(&store, "bob", 2019), 1);

    // Point values: the 16 over 1 upset in round 1 is worth 2 x 8.
    let assigned = assign_tournament_values(&mut store, 2019, &Weights::default())?;
    assert_eq!(assigned, 8);

    assert_eq!(
        store.match_at(key(1, 1)).and_then(|game| game.tournament_value),
        Some(16)
    );
    // 12 over 5 was entered the other way around: Mississippi St won, so
    // the pairing "5 v 12" is off the table and only the round weight
    // applies.
    assert_eq!(
        store.match_at(key(1, 3)).and_then(|game| game.tournament_value),
        Some(2)
    );

    // Group totals are just member sums.
    store.create_group(2019, "Engineering", "alice")?;
    store.join_group(2019, "Engineering", "alice")?;
    store.join_group(2019, "Engineering", "bob")?;
    assert_eq!(
        bracket_pool::scoring::group_score(&store, 2019, "Engineering")?,
        3
    );

    // The whole pool round-trips through its data file.
    let dir = test_dir("season")?;
    let path = dir.join("pool.ron");
    store.save(&path)?;
    let loaded = Store::load(&path)?;
    assert_eq!(store, loaded);
    fs::remove_dir_all(&dir)?;

    Ok(())
}

#[test]
fn predictions_lock_with_the_round() -> anyhow::Result<()> {
    let mut store = Store::default();
    load_csv_reader(&mut store, Cursor::new(EAST_2019))?;

    store.set_round_dates(
        2019,
        1,
        chrono::NaiveDate::from_ymd_opt(2019, 3, 21),
        chrono::NaiveDate::from_ymd_opt(2019, 3, 22),
    )?;

    let before = chrono::NaiveDate::from_ymd_opt(2019, 3, 20).unwrap_or_default();
    let after = chrono::NaiveDate::from_ymd_opt(2019, 3, 21).unwrap_or_default();

    store.set_prediction("alice", key(1, 1), "Duke", None, None, before)?;
    assert!(
        store
            .set_prediction("alice", key(1, 1), "NC Central", None, None, after)
            .is_err()
    );

    // Round 2 has no dates and stays open.
    store.set_prediction("alice", key(2, 1), "Duke", None, None, after)?;

    Ok(())
}

#[test]
fn command_line_round_trip() -> anyhow::Result<()> {
    std::process::Command::new("cargo")
        .arg("build")
        .arg("--bin")
        .arg("bracket-pool")
        .output()?;

    let dir = test_dir("cli")?;
    let data = dir.join("pool.ron");
    let csv = dir.join("2019.csv");
    fs::write(&csv, EAST_2019)?;

    let output = run(&data, &["import", csv.to_string_lossy().as_ref()])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("loaded 8 rows for March Madness 2019"));

    let output = run(
        &data,
        &[
            "record",
            "2019",
            "1",
            "1",
            "--victor",
            "NC Central",
            "--team1-score",
            "76",
            "--team2-score",
            "85",
        ],
    )?;
    assert!(output.status.success());

    let output = run(&data, &["post-points", "March Madness 2019"])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("assigned point values to 1"));

    let output = run(&data, &["show", "--year", "2019"])?;
    assert!(output.status.success());
    let shown = stdout(&output);
    assert!(shown.contains("(16) NC Central"));
    assert!(shown.contains("NC Central wins"));
    assert!(shown.contains("worth 16"));

    let output = run(&data, &["choices", "2019", "2", "1", "--user", "alice"])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("offers alice 3 choices"));

    let output = run(
        &data,
        &["predict", "2019", "2", "1", "--user", "alice", "--team", "VCU"],
    )?;
    assert!(output.status.success());

    let output = run(&data, &["standings", "--year", "2019"])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("alice 0"));

    // An unknown tournament is a descriptive failure, not a crash.
    let output = run(&data, &["post-points", "Big Dance 2019"])?;
    assert!(!output.status.success());

    let output = run(&data, &["build", "--tournament", "Big Dance"])?;
    assert!(!output.status.success());

    fs::remove_dir_all(&dir)?;
    Ok(())
}

fn run(data: &Path, args: &[&str]) -> anyhow::Result<Output> {
    Ok(std::process::Command::new("./target/debug/bracket-pool")
        .arg("--data-file")
        .arg(data)
        .args(args)
        .output()?)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn test_dir(name: &str) -> anyhow::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("bracket-pool-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
