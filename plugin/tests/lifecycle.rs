use hudshield_core::{
    Command, LevelCode, PlayerId, SeverityLevel, COLOR_ENEMY, COLOR_FRIENDLY, COLOR_NEUTRAL,
};
use hudshield_plugin::MitigationPlugin;
use hudshield_world::{self as world, query, World};
use ini::Ini;

fn drive(world: &mut World, commands: Vec<Command>) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

fn connect(world: &mut World, plugin: &mut MitigationPlugin, id: i32, name: &str) -> PlayerId {
    let id = PlayerId::new(id);
    drive(
        world,
        vec![Command::ConnectPlayer {
            id,
            name: name.into(),
        }],
    );
    plugin.on_player_join(world, id);
    id
}

fn enter(world: &mut World, id: PlayerId) {
    drive(world, vec![Command::EnterGame { id }, Command::SpawnAvatar { id }]);
}

fn tick(world: &mut World, plugin: &mut MitigationPlugin) {
    drive(world, vec![Command::Tick]);
    let commands = plugin.on_think(world);
    drive(world, commands);
}

fn settings(level: &str) -> Ini {
    Ini::load_from_str(&format!("[General]\nMitigationLevel={level}\n"))
        .expect("settings ini parses")
}

#[test]
fn global_medium_applies_once_player_is_fully_present() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = MitigationPlugin::with_seed(dir.path().join("Exceptions.ini"), 1);
    let mut world = World::new();

    plugin.on_settings_load(&settings("Medium"));
    plugin.on_level_load(&world);

    let alice = connect(&mut world, &mut plugin, 1, "Alice");
    tick(&mut world, &mut plugin);
    let hud = query::hud(&world, alice).expect("connected");
    assert_eq!(hud.friendly, COLOR_FRIENDLY, "not yet in game");
    assert_eq!(plugin.waiting_count(), 1);

    enter(&mut world, alice);
    tick(&mut world, &mut plugin);
    let hud = query::hud(&world, alice).expect("connected");
    assert_eq!(hud.friendly, COLOR_NEUTRAL);
    assert_eq!(hud.enemy, COLOR_NEUTRAL);
    assert_eq!(hud.neutral, COLOR_NEUTRAL);
    assert_eq!(plugin.waiting_count(), 0);
}

#[test]
fn exception_add_takes_effect_without_a_tick() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = MitigationPlugin::with_seed(dir.path().join("Exceptions.ini"), 1);
    let mut world = World::new();

    plugin.on_settings_load(&settings("Off"));
    plugin.on_level_load(&world);

    let bob = connect(&mut world, &mut plugin, 2, "Bob");
    enter(&mut world, bob);
    tick(&mut world, &mut plugin);
    assert!(query::hud(&world, bob).expect("connected").targeting_enabled);

    let commands = plugin.add_exception(&world, "Bob", SeverityLevel::Aggressive.code());
    assert!(!commands.is_empty());
    drive(&mut world, commands);
    assert!(!query::hud(&world, bob).expect("connected").targeting_enabled);
}

#[test]
fn exception_removal_reverts_to_the_global_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = MitigationPlugin::with_seed(dir.path().join("Exceptions.ini"), 1);
    let mut world = World::new();

    plugin.on_settings_load(&settings("Low"));
    plugin.on_level_load(&world);

    let bob = connect(&mut world, &mut plugin, 2, "Bob");
    enter(&mut world, bob);
    tick(&mut world, &mut plugin);

    let commands = plugin.add_exception(&world, "Bob", SeverityLevel::Aggressive.code());
    drive(&mut world, commands);
    assert!(!query::hud(&world, bob).expect("connected").targeting_enabled);

    let commands = plugin.remove_exception(&world, "Bob");
    drive(&mut world, commands);
    let hud = query::hud(&world, bob).expect("connected");
    assert!(hud.targeting_enabled, "reset restores targeting");
    assert_eq!(hud.enemy, COLOR_FRIENDLY, "global Low reapplied");
}

#[test]
fn exception_overrides_global_until_removed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = MitigationPlugin::with_seed(dir.path().join("Exceptions.ini"), 1);
    let world = World::new();

    plugin.on_settings_load(&settings("High"));
    assert_eq!(plugin.effective_level("Alice"), SeverityLevel::High.code());

    drive(&mut World::new(), plugin.add_exception(&world, "Alice", LevelCode::new(0)));
    assert_eq!(plugin.effective_level("Alice"), LevelCode::new(0));

    drive(&mut World::new(), plugin.remove_exception(&world, "Alice"));
    assert_eq!(plugin.effective_level("Alice"), SeverityLevel::High.code());
}

#[test]
fn invalid_stored_code_is_silently_inert() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = MitigationPlugin::with_seed(dir.path().join("Exceptions.ini"), 1);
    let mut world = World::new();

    plugin.on_settings_load(&settings("Medium"));
    plugin.on_level_load(&world);

    let eve = connect(&mut world, &mut plugin, 3, "Eve");
    let commands = plugin.add_exception(&world, "Eve", LevelCode::new(42));
    drive(&mut world, commands);
    enter(&mut world, eve);
    tick(&mut world, &mut plugin);

    let hud = query::hud(&world, eve).expect("connected");
    assert_eq!(hud.friendly, COLOR_FRIENDLY, "code 42 applies nothing");
    assert_eq!(hud.enemy, COLOR_ENEMY);
    assert!(hud.targeting_enabled);
}

#[test]
fn map_unload_discards_waiting_players_and_resets_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = MitigationPlugin::with_seed(dir.path().join("Exceptions.ini"), 1);
    let mut world = World::new();

    plugin.on_settings_load(
        &Ini::load_from_str("[General]\nMitigationLevel=High\nColorThreshold=5-15\n")
            .expect("settings ini parses"),
    );
    plugin.on_level_load(&world);
    assert!(plugin.is_level_loaded());

    let _ = connect(&mut world, &mut plugin, 1, "Alice");
    let _ = connect(&mut world, &mut plugin, 2, "Bob");
    let commands = plugin.add_exception(&world, "Alice", LevelCode::new(5));
    drive(&mut world, commands);
    assert_eq!(plugin.waiting_count(), 2);

    plugin.on_map_unload();

    assert_eq!(plugin.waiting_count(), 0);
    assert_eq!(plugin.global_level(), SeverityLevel::Off);
    assert_eq!(plugin.thresholds().min(), 20.0);
    assert_eq!(plugin.thresholds().max(), 80.0);
    assert_eq!(plugin.exceptions().count(), 0);

    // The discarded players never received mitigation.
    for id in [1, 2] {
        let hud = query::hud(&world, PlayerId::new(id)).expect("still connected");
        assert!(hud.targeting_enabled);
        assert_eq!(hud.friendly, COLOR_FRIENDLY);
    }
}

#[test]
fn flush_then_load_round_trips_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Exceptions.ini");
    let world = World::new();

    let mut plugin = MitigationPlugin::with_seed(&path, 1);
    drive(&mut World::new(), plugin.add_exception(&world, "Alice", LevelCode::new(3)));
    drive(&mut World::new(), plugin.add_exception(&world, "Bob", LevelCode::new(5)));
    drive(&mut World::new(), plugin.add_exception(&world, "Eve", LevelCode::new(42)));
    plugin.flush_exceptions().expect("flush succeeds");

    let mut reloaded = MitigationPlugin::with_seed(&path, 1);
    reloaded.on_settings_load(&settings("Off"));

    let mut entries: Vec<(String, i64)> = reloaded
        .exceptions()
        .map(|(name, code)| (name.to_string(), code.get()))
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            ("Alice".to_string(), 3),
            ("Bob".to_string(), 5),
            ("Eve".to_string(), 42),
        ]
    );
}

#[test]
fn flush_fails_cleanly_when_the_path_is_unwritable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let world = World::new();

    // The backing path is a directory, so opening it for writing must fail.
    let mut plugin = MitigationPlugin::with_seed(dir.path(), 1);
    drive(&mut World::new(), plugin.add_exception(&world, "Alice", LevelCode::new(1)));
    assert!(plugin.flush_exceptions().is_err());
}

#[test]
fn settings_reload_replaces_previous_exceptions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Exceptions.ini");
    std::fs::write(&path, "[Exceptions]\nCarol = 2\n").expect("seed file");

    let world = World::new();
    let mut plugin = MitigationPlugin::with_seed(&path, 1);
    drive(&mut World::new(), plugin.add_exception(&world, "Alice", LevelCode::new(4)));

    plugin.on_settings_load(&settings("Off"));
    assert_eq!(plugin.effective_level("Carol"), LevelCode::new(2));
    assert_eq!(
        plugin.effective_level("Alice"),
        SeverityLevel::Off.code(),
        "load overwrites prior contents"
    );
}

#[test]
fn level_start_seeds_already_connected_players() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = MitigationPlugin::with_seed(dir.path().join("Exceptions.ini"), 1);
    let mut world = World::new();

    // Alice connected during the load screen, before the level went live.
    let alice = PlayerId::new(1);
    drive(
        &mut world,
        vec![Command::ConnectPlayer {
            id: alice,
            name: "Alice".into(),
        }],
    );

    plugin.on_settings_load(&settings("Aggressive"));
    plugin.on_level_load(&world);
    assert_eq!(plugin.waiting_count(), 1);

    enter(&mut world, alice);
    tick(&mut world, &mut plugin);
    assert!(!query::hud(&world, alice).expect("connected").targeting_enabled);
}
