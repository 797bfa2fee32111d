#![allow(clippy::float_cmp)]

use serde_json::{Value, json};

use super::*;
use crate::model::{Faction, PieceType, StructureType};

// =============================================================
// Helpers
// =============================================================

const CELL: f64 = 20.0;

fn board_json() -> Value {
    json!({
        "globalSize": { "width": 16, "height": 10 },
        "placedZones": [ { "zoneId": "a", "worldPosition": { "x": 5, "y": 3 }, "rotation": 0 } ],
        "globalEntities": [
            { "type": "IsolaniPiece", "position": { "x": 1, "y": 1 }, "rotation": 0,
              "properties": { "CollectedFragments": ["x"], "EquippedFragments": [] } },
            { "type": "Structure", "position": { "x": 0, "y": 9 }, "rotation": 0,
              "properties": { "structureType": "Wall" } }
        ]
    })
}

fn zone_json() -> Value {
    json!({
        "zoneId": "a",
        "name": "alpha",
        "size": { "width": 4, "height": 3 },
        "entities": [
            { "type": "EnemyPiece", "position": { "x": 2, "y": 1 }, "rotation": 0,
              "properties": { "faction": "South", "pieceType": "Knight", "movementFragments": [] } }
        ],
        "metadata": {}
    })
}

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap()
}

/// Engine with the fixture loaded and rendered.
fn rendered_core() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_document("board", pretty(&board_json()));
    core.add_zone_tab("a", Some(pretty(&zone_json())));
    core.switch_tab("board");
    let actions = core.request_render();
    assert_eq!(actions, vec![Action::RenderNeeded]);
    core
}

fn screen_of(core: &EngineCore, x: i64, y: i64) -> Point {
    core.camera.world_to_screen(Cell::new(x, y).center(CELL))
}

fn find<F>(actions: &[Action], pred: F) -> Option<&Action>
where
    F: Fn(&Action) -> bool,
{
    actions.iter().find(|a| pred(a))
}

fn slice(text: &str, span: Span) -> Option<&str> {
    text.get(span.start..span.end)
}

fn has_render_needed(actions: &[Action]) -> bool {
    find(actions, |a| matches!(a, Action::RenderNeeded)).is_some()
}

fn switched_to(actions: &[Action]) -> Option<&str> {
    actions.iter().rev().find_map(|a| match a {
        Action::SwitchTab { tab } => Some(tab.as_str()),
        _ => None,
    })
}

// =============================================================
// Construction
// =============================================================

#[test]
fn core_defaults() {
    let core = EngineCore::new();
    assert_eq!(core.active_tab(), "board");
    assert_eq!(core.camera(), Camera::default());
    assert!(core.scene.is_none());
    assert!(core.hit_boxes().is_empty());
    assert!(!core.can_add());
}

#[test]
fn click_before_render_does_nothing() {
    let mut core = EngineCore::new();
    assert!(core.on_click(Point::new(10.0, 10.0)).is_empty());
}

// =============================================================
// Tabs
// =============================================================

#[test]
fn add_zone_tab_opens_and_switches() {
    let mut core = EngineCore::new();
    let actions = core.add_zone_tab("  beta-02 ", None);
    assert_eq!(
        actions,
        vec![Action::TabOpened { tab: "beta-02".into() }, Action::SwitchTab { tab: "beta-02".into() }]
    );
    assert!(core.document("beta-02").unwrap().contains("\"zoneId\": \"beta-02\""));
}

#[test]
fn add_existing_zone_tab_only_switches() {
    let mut core = rendered_core();
    let actions = core.add_zone_tab("a", None);
    assert_eq!(actions, vec![Action::SwitchTab { tab: "a".into() }]);
    assert!(core.document("a").unwrap().contains("alpha"));
}

#[test]
fn blank_zone_id_is_ignored() {
    let mut core = EngineCore::new();
    assert!(core.add_zone_tab("   ", None).is_empty());
    assert_eq!(core.tab_ids(), ["board".to_owned()]);
}

#[test]
fn closing_active_zone_returns_to_board() {
    let mut core = rendered_core();
    core.switch_tab("a");
    let actions = core.remove_zone_tab("a");
    assert_eq!(actions, vec![Action::TabClosed { tab: "a".into() }, Action::SwitchTab { tab: "board".into() }]);
    assert_eq!(core.active_tab(), "board");
}

#[test]
fn closing_board_is_refused() {
    let mut core = rendered_core();
    assert!(core.remove_zone_tab("board").is_empty());
    assert!(core.document("board").is_some());
}

#[test]
fn switching_to_unknown_tab_is_ignored() {
    let mut core = rendered_core();
    assert!(core.switch_tab("nope").is_empty());
    assert_eq!(core.active_tab(), "board");
}

// =============================================================
// Render requests
// =============================================================

#[test]
fn request_render_resets_view() {
    let mut core = rendered_core();
    core.on_wheel(Point::new(100.0, 100.0), WheelDelta { dx: 0.0, dy: -1.0 });
    assert!(core.camera.zoom > 1.0);
    core.request_render();
    assert_eq!(core.camera, Camera::default());
}

#[test]
fn request_render_with_bad_board_raises_notice_and_keeps_scene() {
    let mut core = rendered_core();
    let before = core.hit_boxes().len();
    core.set_document("board", "{ broken".to_owned());
    let actions = core.request_render();
    assert!(matches!(actions.as_slice(), [Action::Notice { .. }]));
    assert_eq!(core.hit_boxes().len(), before);
}

#[test]
fn render_reads_latest_text() {
    let mut core = rendered_core();
    let mut zone = zone_json();
    zone["entities"][0]["position"] = json!({ "x": 0, "y": 0 });
    core.set_document("a", pretty(&zone));
    core.request_render();
    assert_eq!(core.hit_boxes()[0].cell, Cell::new(5, 3));
}

#[test]
fn redraw_with_bad_board_is_silent() {
    let mut core = rendered_core();
    core.set_document("board", "{ broken".to_owned());
    let actions = core.on_wheel(Point::new(0.0, 0.0), WheelDelta { dx: 0.0, dy: 1.0 });
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert!(core.scene.is_none());
}

// =============================================================
// Pan / zoom
// =============================================================

#[test]
fn primary_drag_pans() {
    let mut core = rendered_core();
    let down = core.on_pointer_down(Point::new(100.0, 100.0), Button::Primary);
    assert_eq!(down, vec![Action::SetCursor { cursor: "grabbing".into() }]);
    let moved = core.on_pointer_move(Point::new(130.0, 90.0));
    assert!(has_render_needed(&moved));
    assert_eq!(core.camera.pan(), Point::new(30.0, -10.0));
    let up = core.on_pointer_up(Point::new(130.0, 90.0), Button::Primary);
    assert_eq!(up, vec![Action::SetCursor { cursor: "default".into() }]);
    assert!(core.on_pointer_move(Point::new(500.0, 500.0)).is_empty());
    assert_eq!(core.camera.pan(), Point::new(30.0, -10.0));
}

#[test]
fn secondary_button_does_not_pan() {
    let mut core = rendered_core();
    assert!(core.on_pointer_down(Point::new(0.0, 0.0), Button::Secondary).is_empty());
    assert!(core.on_pointer_move(Point::new(50.0, 50.0)).is_empty());
    assert_eq!(core.camera.pan(), Point::new(0.0, 0.0));
}

#[test]
fn second_drag_starts_from_current_pan() {
    let mut core = rendered_core();
    core.on_pointer_down(Point::new(0.0, 0.0), Button::Primary);
    core.on_pointer_move(Point::new(10.0, 10.0));
    core.on_pointer_up(Point::new(10.0, 10.0), Button::Primary);
    core.on_pointer_down(Point::new(50.0, 50.0), Button::Primary);
    core.on_pointer_move(Point::new(55.0, 45.0));
    assert_eq!(core.camera.pan(), Point::new(15.0, 5.0));
}

#[test]
fn wheel_zoom_is_anchored() {
    let mut core = rendered_core();
    let anchor = Point::new(123.0, 77.0);
    let before = core.camera.screen_to_world(anchor);
    let actions = core.on_wheel(anchor, WheelDelta { dx: 0.0, dy: -3.0 });
    assert!(has_render_needed(&actions));
    let after = core.camera.screen_to_world(anchor);
    assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
    assert!((core.camera.zoom - 1.1).abs() < 1e-12);
}

#[test]
fn wheel_zoom_clamps() {
    let mut core = rendered_core();
    for _ in 0..100 {
        core.on_wheel(Point::new(0.0, 0.0), WheelDelta { dx: 0.0, dy: -1.0 });
    }
    assert_eq!(core.camera.zoom, 10.0);
    for _ in 0..200 {
        core.on_wheel(Point::new(0.0, 0.0), WheelDelta { dx: 0.0, dy: 1.0 });
    }
    assert_eq!(core.camera.zoom, 0.1);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn clicking_zone_entity_selects_it() {
    let mut core = rendered_core();
    let actions = core.on_click(screen_of(&core, 7, 4));
    let Some(Action::EntitySelected { zone_id, entity_index, entity, cell }) =
        find(&actions, |a| matches!(a, Action::EntitySelected { .. }))
    else {
        panic!("no selection in {actions:?}");
    };
    assert_eq!(zone_id.as_deref(), Some("a"));
    assert_eq!(*entity_index, 0);
    assert_eq!(entity.type_tag, "EnemyPiece");
    assert_eq!(*cell, Cell::new(7, 4));
    assert_eq!(switched_to(&actions), Some("a"));
    assert_eq!(core.active_tab(), "a");
}

#[test]
fn selecting_zone_entity_highlights_its_text() {
    let mut core = rendered_core();
    let actions = core.on_click(screen_of(&core, 7, 4));
    let Some(Action::Highlight { tab, span, .. }) = find(&actions, |a| matches!(a, Action::Highlight { .. })) else {
        panic!("no highlight in {actions:?}");
    };
    assert_eq!(tab, "a");
    let text = core.document("a").unwrap();
    assert!(slice(text, *span).unwrap().starts_with("\"position\""));
}

#[test]
fn selecting_global_isolani_switches_to_board() {
    let mut core = rendered_core();
    core.switch_tab("a");
    let actions = core.on_click(screen_of(&core, 1, 1));
    assert!(find(&actions, |a| matches!(a, Action::EntitySelected { zone_id: None, entity_index: 0, .. })).is_some());
    assert_eq!(switched_to(&actions), Some("board"));
    let Some(Action::Highlight { tab, span, .. }) = find(&actions, |a| matches!(a, Action::Highlight { .. })) else {
        panic!("no highlight in {actions:?}");
    };
    assert_eq!(tab, "board");
    assert!(slice(core.document("board").unwrap(), *span).unwrap().starts_with("\"type\": \"IsolaniPiece\""));
}

#[test]
fn selection_shows_summary() {
    let mut core = rendered_core();
    let actions = core.on_click(screen_of(&core, 7, 4));
    let Some(Action::ShowInfo { lines }) = find(&actions, |a| matches!(a, Action::ShowInfo { .. })) else {
        panic!("no info in {actions:?}");
    };
    assert_eq!(lines[0].value, "(7, 4)");
    assert!(lines.iter().any(|l| l.label == "Piece Type" && l.value == "Knight"));
}

#[test]
fn reformatted_text_selects_without_highlight() {
    let mut core = rendered_core();
    core.set_document("a", zone_json().to_string());
    core.request_render();
    let actions = core.on_click(screen_of(&core, 7, 4));
    assert!(find(&actions, |a| matches!(a, Action::EntitySelected { .. })).is_some());
    assert!(find(&actions, |a| matches!(a, Action::Highlight { .. })).is_none());
}

#[test]
fn selection_survives_pan_and_zoom() {
    let mut core = rendered_core();
    core.on_pointer_down(Point::new(0.0, 0.0), Button::Primary);
    core.on_pointer_move(Point::new(-37.0, 21.0));
    core.on_pointer_up(Point::new(-37.0, 21.0), Button::Primary);
    core.on_wheel(Point::new(200.0, 150.0), WheelDelta { dx: 0.0, dy: 1.0 });
    let actions = core.on_click(screen_of(&core, 7, 4));
    assert!(find(&actions, |a| matches!(a, Action::EntitySelected { entity_index: 0, .. })).is_some());
}

// =============================================================
// Empty cells
// =============================================================

#[test]
fn empty_cell_in_zone_reports_zone() {
    let mut core = rendered_core();
    let actions = core.on_click(screen_of(&core, 5, 3));
    assert!(actions.contains(&Action::EmptyCellClicked { cell: Cell::new(5, 3), zone_id: Some("a".into()) }));
    assert_eq!(switched_to(&actions), Some("a"));
    let target = core.ui.target.clone().unwrap();
    assert_eq!(target.local, Cell::new(0, 0));
}

#[test]
fn empty_cell_outside_zones_goes_to_board() {
    let mut core = rendered_core();
    core.switch_tab("a");
    let actions = core.on_click(screen_of(&core, 14, 8));
    assert!(actions.contains(&Action::EmptyCellClicked { cell: Cell::new(14, 8), zone_id: None }));
    assert_eq!(switched_to(&actions), Some("board"));
    let Some(Action::ShowInfo { lines }) = find(&actions, |a| matches!(a, Action::ShowInfo { .. })) else {
        panic!("no info in {actions:?}");
    };
    assert_eq!(lines[1].value, "No entity at this location.");
}

// =============================================================
// Add entity
// =============================================================

#[test]
fn template_follows_target_and_type() {
    let mut core = rendered_core();
    core.set_template(EntityTemplate::EnemyPiece { piece_type: PieceType::Rook, faction: Faction::North });
    assert!(!core.can_add());

    let actions = core.on_click(screen_of(&core, 6, 4));
    let Some(Action::TemplateChanged { text, can_add }) = find(&actions, |a| matches!(a, Action::TemplateChanged { .. }))
    else {
        panic!("no template in {actions:?}");
    };
    assert!(*can_add);
    let v: Value = serde_json::from_str(text).unwrap();
    assert_eq!(v["position"], json!({ "x": 1, "y": 1 }));
    assert_eq!(v["properties"]["pieceType"], "Rook");
}

#[test]
fn enemy_template_disabled_outside_zone() {
    let mut core = rendered_core();
    core.set_template(EntityTemplate::EnemyPiece { piece_type: PieceType::Pawn, faction: Faction::South });
    core.on_click(screen_of(&core, 14, 8));
    assert!(!core.can_add());
    core.set_template(EntityTemplate::Structure { structure_type: StructureType::Wall });
    assert!(core.can_add());
}

#[test]
fn append_to_board_adds_one_entity_and_rerenders() {
    let mut core = rendered_core();
    core.set_template(EntityTemplate::Structure { structure_type: StructureType::Wall });
    core.on_click(screen_of(&core, 14, 8));
    assert_eq!(core.active_tab(), "board");
    let before: Value = serde_json::from_str(core.document("board").unwrap()).unwrap();

    let template = core.template_text();
    let actions = core.append_entity(&template, None);

    assert!(matches!(&actions[0], Action::TabTextChanged { tab, .. } if tab == "board"));
    assert!(has_render_needed(&actions));
    assert!(!core.can_add());

    let after: Value = serde_json::from_str(core.document("board").unwrap()).unwrap();
    let old = before["globalEntities"].as_array().unwrap();
    let new = after["globalEntities"].as_array().unwrap();
    assert_eq!(new.len(), old.len() + 1);
    assert_eq!(&new[..old.len()], &old[..]);
    assert_eq!(after["placedZones"], before["placedZones"]);
    assert_eq!(after["globalSize"], before["globalSize"]);

    // The new wall is drawn and clickable.
    assert!(core.hit_boxes().iter().any(|h| h.cell == Cell::new(14, 8)));
}

#[test]
fn append_to_zone_uses_explicit_tab() {
    let mut core = rendered_core();
    let entity = r#"{ "type": "Structure", "position": { "x": 3, "y": 2 }, "properties": { "structureType": "Safezone" } }"#;
    core.append_entity(entity, Some("a"));
    let zone = core.doc.parse_zone("a").unwrap();
    assert_eq!(zone.entities.len(), 2);
    assert!(core.hit_boxes().iter().any(|h| h.cell == Cell::new(8, 5)));
}

#[test]
fn append_invalid_template_raises_notice() {
    let mut core = rendered_core();
    let before = core.document("board").unwrap().to_owned();
    let actions = core.append_entity("{ nope", None);
    assert!(matches!(actions.as_slice(), [Action::Notice { .. }]));
    assert_eq!(core.document("board").unwrap(), before);
}

#[test]
fn template_text_follows_configured_indent() {
    let mut core = EngineCore::with_config(EditorConfig { template_indent: 2, ..EditorConfig::default() });
    core.set_template(EntityTemplate::Structure { structure_type: StructureType::Wall });
    assert!(core.template_text().starts_with("{\n  \"type\""));
}

// =============================================================
// Loosely typed documents
// =============================================================

fn core_with(board: &Value, zone: &Value) -> EngineCore {
    let mut core = EngineCore::new();
    core.set_document("board", pretty(board));
    core.add_zone_tab("a", Some(pretty(zone)));
    core
}

#[test]
fn zone_with_null_name_still_renders() {
    let mut zone = zone_json();
    zone["name"] = Value::Null;
    let mut core = core_with(&board_json(), &zone);
    assert_eq!(core.request_render(), vec![Action::RenderNeeded]);
    let zone_boxes: Vec<&HitBox> = core.hit_boxes().iter().filter(|h| h.zone_id.as_deref() == Some("a")).collect();
    assert_eq!(zone_boxes.len(), 1);
    assert_eq!(zone_boxes[0].cell, Cell::new(7, 4));
}

#[test]
fn float_coordinates_are_floored() {
    let mut zone = zone_json();
    zone["entities"].as_array_mut().unwrap().push(json!({
        "type": "Structure", "position": { "x": 1.0, "y": 2.5 }, "rotation": 0,
        "properties": { "structureType": "Wall" }
    }));
    let mut core = core_with(&board_json(), &zone);
    core.request_render();
    let cells: Vec<(usize, Cell)> = core
        .hit_boxes()
        .iter()
        .filter(|h| h.zone_id.as_deref() == Some("a"))
        .map(|h| (h.entity_index, h.cell))
        .collect();
    assert_eq!(cells, vec![(0, Cell::new(7, 4)), (1, Cell::new(6, 5))]);
}

#[test]
fn string_rotation_renders_without_notice() {
    let mut board = board_json();
    board["globalEntities"][0]["rotation"] = json!("0");
    let mut core = core_with(&board, &zone_json());
    assert_eq!(core.request_render(), vec![Action::RenderNeeded]);
    assert!(core.hit_boxes().iter().any(|h| h.zone_id.is_none() && h.cell == Cell::new(1, 1)));

    let actions = core.on_click(screen_of(&core, 1, 1));
    assert!(find(&actions, |a| matches!(a, Action::EntitySelected { zone_id: None, entity_index: 0, .. })).is_some());
}

#[test]
fn mistyped_zone_still_reports_its_cells() {
    let mut zone = zone_json();
    zone["size"] = json!({ "width": "4", "height": 3.0 });
    zone["metadata"] = json!("none");
    let mut core = core_with(&board_json(), &zone);
    core.request_render();
    let actions = core.on_click(screen_of(&core, 8, 5));
    assert!(actions.contains(&Action::EmptyCellClicked { cell: Cell::new(8, 5), zone_id: Some("a".to_owned()) }));
}

#[test]
fn entity_without_position_is_skipped_but_keeps_indices() {
    let mut zone = zone_json();
    zone["entities"].as_array_mut().unwrap().insert(0, json!({ "type": "Decoration", "position": { "x": "left" } }));
    let mut core = core_with(&board_json(), &zone);
    core.request_render();
    let zone_boxes: Vec<&HitBox> = core.hit_boxes().iter().filter(|h| h.zone_id.as_deref() == Some("a")).collect();
    assert_eq!(zone_boxes.len(), 1);
    assert_eq!(zone_boxes[0].entity_index, 1);
}

#[test]
fn far_placement_saturates_instead_of_panicking() {
    let mut board = board_json();
    board["placedZones"][0]["worldPosition"] = json!({ "x": i64::MAX, "y": 3 });
    let mut core = core_with(&board, &zone_json());
    assert_eq!(core.request_render(), vec![Action::RenderNeeded]);
    let zone_box = core.hit_boxes().iter().find(|h| h.zone_id.as_deref() == Some("a")).unwrap();
    assert_eq!(zone_box.cell, Cell::new(i64::MAX, 4));

    // Clicking near the origin still works and finds no zone there.
    let actions = core.on_click(screen_of(&core, 14, 8));
    assert!(actions.contains(&Action::EmptyCellClicked { cell: Cell::new(14, 8), zone_id: None }));
}

// =============================================================
// Serialization to the host
// =============================================================

#[test]
fn actions_serialize_with_tag_and_camel_case() {
    let a = Action::EmptyCellClicked { cell: Cell::new(1, 2), zone_id: Some("a".into()) };
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        json!({ "action": "emptyCellClicked", "cell": { "x": 1, "y": 2 }, "zoneId": "a" })
    );
    assert_eq!(serde_json::to_value(Action::RenderNeeded).unwrap(), json!({ "action": "renderNeeded" }));
}

#[test]
fn viewport_is_recorded() {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 600.0, 2.0);
    assert_eq!((core.viewport_width, core.viewport_height, core.dpr), (800.0, 600.0, 2.0));
}
