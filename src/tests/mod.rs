
use std::num::NonZeroU64;

use indicatif::ProgressBar;

use crate::api::{ApiError, CatalogClient, ClientOptions, NamedResource, Pokemon};
use crate::controller::{parse_command, Command, Controller, Effect, PageFetch};
use crate::output::{self, OutputFormat};
use crate::pagination::{compute, PageControl, PaginationRequest};
use crate::render::{self, RenderStyle};
use crate::viewer::{Screen, Viewer, ViewerError, ViewerOptions};

use catalog_stub::{catalog, serve, Reply, NAMES};

fn size(n: u64) -> NonZeroU64 {
    NonZeroU64::new(n).unwrap()
}

fn card(id: u64, name: &str) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        ..Pokemon::default()
    }
}

fn plain() -> RenderStyle {
    RenderStyle {
        columns: 3,
        color: false,
    }
}

#[test]
fn clicking_every_control_lands_on_its_target() {
    let mut controller = Controller::new(size(20));
    controller.seek(5);
    controller.record_total(200);

    let plan = controller.plan();
    for control in plan.iter() {
        let mut clicked = controller.clone();
        let Some(command) = clicked.activate(control) else {
            assert_eq!(*control, PageControl::Ellipsis);
            continue;
        };
        let effect = clicked.apply(command).unwrap();
        let expected = control.target(5).unwrap();
        assert_eq!(
            effect,
            Effect::FetchPage(PageFetch {
                page: expected,
                limit: 20,
                offset: (expected - 1) * 20,
            })
        );
    }
}

#[test]
fn walking_next_to_the_end_keeps_plan_consistent() {
    let mut controller = Controller::new(size(7));
    controller.seek(1);
    controller.record_total(50);
    let total = controller.total_pages();
    assert_eq!(total, 8);

    for page in 1..=total {
        let plan = controller.plan();
        assert_eq!(plan.active_page(), Some(page));
        assert_eq!(plan.has_previous(), page > 1);
        assert_eq!(plan.has_next(), page < total);
        if page < total {
            controller.apply(Command::Next).unwrap();
        }
    }
    assert!(controller.apply(Command::Next).is_err());
}

#[test]
fn typed_commands_drive_the_controller() {
    let mut controller = Controller::new(size(20));
    controller.seek(1);
    controller.record_total(1000);

    let effect = controller.apply(parse_command("g 42").unwrap()).unwrap();
    assert!(matches!(effect, Effect::FetchPage(PageFetch { page: 42, .. })));
    let effect = controller.apply(parse_command("size 50").unwrap()).unwrap();
    assert_eq!(
        effect,
        Effect::FetchPage(PageFetch {
            page: 1,
            limit: 50,
            offset: 0,
        })
    );
    let effect = controller.apply(parse_command("s Mew").unwrap()).unwrap();
    assert_eq!(effect, Effect::FetchByName("mew".to_string()));
    assert!(controller.plan().is_empty());
}

#[test]
fn page_screen_renders_grid_bar_and_footer() {
    let plan = compute(PaginationRequest {
        total_items: 100,
        page_size: size(20),
        current_page: 3,
    });
    let screen = Screen::Page {
        cards: vec![card(41, "zubat"), card(42, "golbat")],
        plan,
        page: 3,
        total_pages: 5,
        total_items: 100,
    };
    let text = render::render_screen(&screen, plain());
    assert!(text.contains("zubat"));
    assert!(text.contains("< Previous 1 2 [3] 4 5 Next >"));
    assert!(text.ends_with(":: Page 3/5 :: 100 entries\n"));

    let exported = output::render(&output::build_document(&screen), OutputFormat::Text);
    assert_eq!(exported, b"#41 zubat\n#42 golbat\n".to_vec());
}

#[test]
fn config_file_feeds_the_controller_page_size() {
    let cfg = crate::config::parse_config("per_page: 12\nstart_page: 4\n").unwrap();
    let mut controller = Controller::new(size(cfg.page_size.unwrap()));
    let effect = controller.seek(cfg.start_page.unwrap());
    assert_eq!(
        effect,
        Effect::FetchPage(PageFetch {
            page: 4,
            limit: 12,
            offset: 36,
        })
    );
}

fn stub_viewer(origin: &str) -> Viewer {
    Viewer::new(ViewerOptions {
        base_url: format!("{origin}/api/v2"),
        page_size: 2,
        timeout_seconds: 5,
        ..ViewerOptions::default()
    })
    .unwrap()
}

fn names(cards: &[Pokemon]) -> Vec<&str> {
    cards.iter().map(|c| c.name.as_str()).collect()
}

#[tokio::test]
async fn listing_records_total_and_builds_plan() {
    let origin = serve(catalog).await;
    let mut viewer = stub_viewer(&origin);

    let Screen::Page {
        cards,
        plan,
        page,
        total_pages,
        total_items,
    } = viewer.open().await.unwrap()
    else {
        panic!("expected a page screen");
    };
    assert_eq!(names(&cards), vec!["bulbasaur", "ivysaur"]);
    assert_eq!((page, total_pages, total_items), (1, 2, 3));
    assert_eq!(plan.page_numbers(), vec![1, 2]);
    assert_eq!(plan.active_page(), Some(1));
    assert!(plan.has_next() && !plan.has_previous());
    assert_eq!(viewer.controller().state().total_items, 3);
    assert_eq!(viewer.controller().state().visible_cards, 2);

    let Screen::Page { cards, plan, .. } = viewer.dispatch(Command::Next).await.unwrap() else {
        panic!("expected a page screen");
    };
    assert_eq!(names(&cards), vec!["venusaur"]);
    assert_eq!(plan.active_page(), Some(2));
    assert!(!plan.has_next());
}

#[tokio::test]
async fn search_miss_is_a_screen_but_server_errors_are_not() {
    let origin = serve(catalog).await;
    let mut viewer = stub_viewer(&origin);

    let screen = viewer
        .dispatch(Command::Search("Mew".to_string()))
        .await
        .unwrap();
    assert_eq!(
        screen,
        Screen::NotFound {
            term: "mew".to_string()
        }
    );
    assert!(viewer.cards().is_empty());

    let before = viewer.controller().state().clone();
    let err = viewer
        .dispatch(Command::Search("boom".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ViewerError::Api(ApiError::Status { status: 500, .. })
    ));
    assert_eq!(*viewer.controller().state(), before);

    let Screen::SearchHit { card } = viewer
        .dispatch(Command::Search("ivysaur".to_string()))
        .await
        .unwrap()
    else {
        panic!("expected a search hit");
    };
    assert_eq!(card.id, 2);
    assert!(viewer.controller().plan().is_empty());
    assert_eq!(
        viewer.dispatch(Command::Details(1)).await.unwrap(),
        Screen::Details(card)
    );
}

#[tokio::test]
async fn failed_next_leaves_current_page_in_place() {
    let origin = serve(|origin: &str, path: &str| {
        if path.contains("offset=2") {
            Reply::status(503)
        } else {
            catalog(origin, path)
        }
    })
    .await;
    let mut viewer = stub_viewer(&origin);
    viewer.open().await.unwrap();

    assert!(viewer.dispatch(Command::Next).await.is_err());
    assert_eq!(viewer.controller().state().current_page, 1);
    assert_eq!(viewer.controller().plan().active_page(), Some(1));
    assert_eq!(names(viewer.cards()), vec!["bulbasaur", "ivysaur"]);
}

#[tokio::test]
async fn concurrent_card_fetches_keep_list_order() {
    let origin = serve(catalog).await;
    let client = CatalogClient::new(ClientOptions {
        base_url: format!("{origin}/api/v2"),
        timeout_seconds: 5,
        ..ClientOptions::default()
    })
    .unwrap();
    let entries: Vec<NamedResource> = NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| NamedResource {
            name: name.to_string(),
            url: format!("{origin}/api/v2/pokemon/{}/", i + 1),
        })
        .collect();

    let cards = client
        .fetch_cards(&entries, 3, &ProgressBar::hidden())
        .await
        .unwrap();
    assert_eq!(cards.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(names(&cards), NAMES.to_vec());
}

#[tokio::test]
async fn missing_detail_url_is_a_status_error() {
    let origin = serve(catalog).await;
    let client = CatalogClient::new(ClientOptions {
        base_url: format!("{origin}/api/v2"),
        ..ClientOptions::default()
    })
    .unwrap();
    let err = client
        .fetch_by_url(&format!("{origin}/api/v2/pokemon/99/"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    let err = client.fetch_by_name("missingno").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { ref name } if name == "missingno"));
}
