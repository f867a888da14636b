use clap::Parser;
use std::fs;
use std::path::Path;
use tourbook::cli::Cli;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_rate_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub const RATES_JSON: &str = r#"[
        { "currency": "USD", "buy": 31.5, "sell": 32.1 },
        { "currency": "JPY", "buy": 4.76, "sell": 4.91 }
    ]"#;
}

/// Writes a config that sandboxes data under the test's tempdir.
fn write_config(dir: &Path, bank_base_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("config.yaml");
    let data_path = dir.join("data");
    let config_content = format!(
        r#"
providers:
  bank:
    base_url: {bank_base_url}
data_path: {}
"#,
        data_path.display()
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path
}

async fn run_cmd(config_path: &Path, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tourbook", "--config-path", config_path.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("argv should parse");
    tourbook::run(cli).await
}

fn read_summary_sheet(dir: &Path, tour_name: &str) -> String {
    fs::read_to_string(dir.join(format!("{tour_name}-report-summary.csv")))
        .expect("summary sheet should exist")
}

#[test_log::test(tokio::test)]
async fn test_full_bookkeeping_flow() {
    let mock_server = test_utils::create_rate_server(test_utils::RATES_JSON).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &mock_server.uri());
    let out = dir.path().join("reports");
    let out_str = out.to_str().unwrap().to_string();

    run_cmd(&config, &["tour", "add", "Tokyo", "--date", "2024-03-10"])
        .await
        .unwrap();
    run_cmd(
        &config,
        &[
            "entry", "add", "--desc", "Salary", "--type", "income", "--amount", "1000",
            "--currency", "TWD", "--date", "2024-03-01",
        ],
    )
    .await
    .unwrap();
    run_cmd(
        &config,
        &[
            "entry", "add", "--desc", "Hotel deposit", "--type", "expense", "--amount", "100",
            "--currency", "USD", "--date", "2024-03-02",
        ],
    )
    .await
    .unwrap();
    run_cmd(
        &config,
        &[
            "prep", "add", "--category", "flight", "--name", "TPE-NRT", "--cost", "50",
            "--currency", "USD",
        ],
    )
    .await
    .unwrap();

    run_cmd(&config, &["rates", "refresh"]).await.unwrap();
    run_cmd(&config, &["export", "--out", &out_str]).await.unwrap();

    // 1000 income, (100 + 50) USD * 31.5 committed as expense
    let summary = read_summary_sheet(&out, "Tokyo");
    assert!(summary.contains("income,1000.00"), "got: {summary}");
    assert!(summary.contains("expense,4725.00"), "got: {summary}");
    assert!(summary.contains("profit,-3725.00"), "got: {summary}");

    // Display commands run clean over the same data
    run_cmd(&config, &["tour", "list"]).await.unwrap();
    run_cmd(&config, &["entry", "list"]).await.unwrap();
    run_cmd(&config, &["prep", "list"]).await.unwrap();
    run_cmd(&config, &["summary"]).await.unwrap();
    run_cmd(&config, &["rates", "show"]).await.unwrap();
}

#[test_log::test(tokio::test)]
async fn test_edit_and_delete_reshape_the_report() {
    let mock_server = test_utils::create_rate_server(test_utils::RATES_JSON).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &mock_server.uri());
    let out = dir.path().join("reports");
    let out_str = out.to_str().unwrap().to_string();

    run_cmd(&config, &["tour", "add", "Osaka", "--date", "2024-05-01"])
        .await
        .unwrap();
    run_cmd(
        &config,
        &[
            "entry", "add", "--desc", "Dinner", "--type", "expense", "--amount", "100",
            "--currency", "USD", "--date", "2024-05-02",
        ],
    )
    .await
    .unwrap();
    run_cmd(&config, &["rates", "refresh"]).await.unwrap();

    // Edit only the amount; other fields keep their values
    run_cmd(&config, &["entry", "edit", "--id", "1", "--amount", "200"])
        .await
        .unwrap();
    run_cmd(&config, &["export", "--out", &out_str]).await.unwrap();
    let summary = read_summary_sheet(&out, "Osaka");
    assert!(summary.contains("expense,6300.00"), "got: {summary}");
    let entries = fs::read_to_string(out.join("Osaka-report-entries.csv")).unwrap();
    assert!(entries.contains("Dinner"), "description preserved: {entries}");

    // Editing an unknown id is an error and changes nothing
    assert!(
        run_cmd(&config, &["entry", "edit", "--id", "9", "--amount", "1"])
            .await
            .is_err()
    );

    // Deleting the entry (confirmed via --yes) empties the report
    run_cmd(&config, &["entry", "rm", "1", "--yes"]).await.unwrap();
    run_cmd(&config, &["export", "--out", &out_str]).await.unwrap();
    let summary = read_summary_sheet(&out, "Osaka");
    assert!(summary.contains("expense,0.00"), "got: {summary}");

    // Deleting a missing id stays a no-op
    run_cmd(&config, &["entry", "rm", "42", "--yes"]).await.unwrap();
}

#[test_log::test(tokio::test)]
async fn test_failed_refresh_keeps_last_known_rates() {
    let good_server = test_utils::create_rate_server(test_utils::RATES_JSON).await;
    let bad_server = test_utils::create_rate_server(r#"{"maintenance": true}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports");
    let out_str = out.to_str().unwrap().to_string();

    let config = write_config(dir.path(), &good_server.uri());
    run_cmd(&config, &["tour", "add", "NYC", "--date", "2024-06-01"])
        .await
        .unwrap();
    run_cmd(
        &config,
        &[
            "entry", "add", "--desc", "Museum", "--type", "expense", "--amount", "10",
            "--currency", "USD", "--date", "2024-06-02",
        ],
    )
    .await
    .unwrap();
    run_cmd(&config, &["rates", "refresh"]).await.unwrap();

    // Point at a feed that no longer parses; the refresh degrades silently
    let config = write_config(dir.path(), &bad_server.uri());
    run_cmd(&config, &["rates", "refresh"]).await.unwrap();

    run_cmd(&config, &["export", "--out", &out_str]).await.unwrap();
    let summary = read_summary_sheet(&out, "NYC");
    assert!(
        summary.contains("expense,315.00"),
        "stale USD rate should still apply: {summary}"
    );
}

#[test_log::test(tokio::test)]
async fn test_invalid_input_is_rejected_before_the_ledger() {
    let mock_server = test_utils::create_rate_server(test_utils::RATES_JSON).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &mock_server.uri());

    run_cmd(&config, &["tour", "add", "Kyoto"]).await.unwrap();

    // Unknown enum values and negative amounts never reach the store
    assert!(
        run_cmd(
            &config,
            &[
                "entry", "add", "--desc", "x", "--type", "transfer", "--amount", "1",
                "--currency", "TWD",
            ],
        )
        .await
        .is_err()
    );
    assert!(
        run_cmd(
            &config,
            &[
                "entry", "add", "--desc", "x", "--type", "income", "--amount=-5",
                "--currency", "TWD",
            ],
        )
        .await
        .is_err()
    );
    assert!(
        run_cmd(
            &config,
            &[
                "entry", "add", "--desc", "x", "--type", "income", "--amount", "1",
                "--currency", "EUR",
            ],
        )
        .await
        .is_err()
    );

    // Nothing was recorded
    let out = dir.path().join("reports");
    let out_str = out.to_str().unwrap().to_string();
    run_cmd(&config, &["export", "--out", &out_str]).await.unwrap();
    let entries = fs::read_to_string(out.join("Kyoto-report-entries.csv")).unwrap();
    assert_eq!(entries.lines().count(), 1, "header only: {entries}");
}

#[test_log::test(tokio::test)]
async fn test_tour_delete_and_reset() {
    let mock_server = test_utils::create_rate_server(test_utils::RATES_JSON).await;
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &mock_server.uri());

    run_cmd(&config, &["tour", "add", "One"]).await.unwrap();
    run_cmd(&config, &["tour", "add", "Two"]).await.unwrap();
    run_cmd(&config, &["tour", "use", "1"]).await.unwrap();
    run_cmd(&config, &["tour", "rm", "1", "--yes"]).await.unwrap();

    // The deleted tour is gone; its sibling still resolves explicitly
    let out = dir.path().join("reports");
    let out_str = out.to_str().unwrap().to_string();
    assert!(run_cmd(&config, &["export", "--out", &out_str]).await.is_err());
    run_cmd(&config, &["export", "--tour", "2", "--out", &out_str])
        .await
        .unwrap();

    run_cmd(&config, &["reset", "--yes"]).await.unwrap();
    assert!(
        run_cmd(&config, &["export", "--tour", "2", "--out", &out_str])
            .await
            .is_err(),
        "reset must drop every tour"
    );
}
