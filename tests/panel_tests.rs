use serde_json::json;
use staffusr::api::{set_silent, HttpUserApi};
use staffusr::config::PanelConfig;
use staffusr::controller::UserTableController;
use staffusr::models::{parse_seed_rows, Role};
use staffusr::panel::PanelSession;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED: &str = r#"[
    {"username": "kim", "fullname": "Kim Lee", "role": "User"},
    {"username": "ana", "fullname": "Ana Silva", "role": ":role/admin"}
]"#;

fn session(server: &MockServer, html: Option<std::path::PathBuf>) -> PanelSession<HttpUserApi> {
    set_silent(true);
    yansi::disable();
    let cfg = PanelConfig::default().with_server_root(&server.uri());
    let api = HttpUserApi::new(cfg.clone()).unwrap();
    let controller = UserTableController::new(api, parse_seed_rows(SEED).unwrap());
    PanelSession::new(controller, cfg, html)
}

async fn run_script(session: &mut PanelSession<HttpUserApi>, script: &str) -> String {
    let mut out = Vec::new();
    session.run(script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn create_edit_delete_script() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/staff/usr"))
        .and(body_partial_json(json!({"role": ":role/reporter"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "bo",
            "fullname": "Bo Chen",
            "role": ":role/reporter"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/staff/usr/bo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "bo",
            "fullname": "Jane Doe"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/staff/usr/ana"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut s = session(&server, None);
    let out = run_script(
        &mut s,
        r#"
create username=bo fullname="Bo Chen" role=reporter password=pw
edit bo
set fullname="Jane Doe" password=""
save
delete ana
no
delete ana
yes
quit
show
"#,
    )
    .await;

    assert!(out.contains("[new user] ✓ Added user bo"));
    assert!(out.contains("Delete ana? (yes/no)"));
    assert!(out.contains("[users] ✓ ana deleted"));

    let table = s.controller().table();
    let names: Vec<&str> = table.rows().iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, vec!["kim", "bo"]);
    let bo = table.row("bo").unwrap();
    assert_eq!(bo.fullname, "Jane Doe");
    assert_eq!(bo.role, Role::Reporter);
}

#[tokio::test]
async fn bad_lines_do_not_stop_the_panel() {
    let server = MockServer::start().await;
    let mut s = session(&server, None);
    let out = run_script(&mut s, "bogus\nset fullname=x\nyes\ncreate nonsense\nhelp\n").await;

    assert!(out.contains("(try `help`)"));
    assert!(out.contains("No user is being edited"));
    assert!(out.contains("Nothing to confirm"));
    assert!(out.contains("expected name=value, got 'nonsense'"));
    assert!(out.contains("Commands:"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn html_page_follows_each_command() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/staff/usr/kim"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("panel.html");
    let mut s = session(&server, Some(page.clone()));
    run_script(&mut s, "delete kim\nyes\n").await;

    let html = std::fs::read_to_string(&page).unwrap();
    assert!(html.contains("alert-danger"));
    assert!(html.contains("Don&#x27;t delete yourself"));
    assert!(html.contains(r#"<tr id="row_kim">"#));
    assert!(html.contains(r#"<tr id="row_ana">"#));
}
