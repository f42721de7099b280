mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

struct Fixture {
    token: String,
    handle: String,
}

async fn fixture(server: &common::TestServer) -> Result<Fixture> {
    let username = common::unique("jobadmin");
    let token = common::register_user(server, &username, true).await?;

    let handle = common::unique("jobco");
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/companies", server.base_url))
        .json(&json!({ "_token": token, "handle": handle, "name": "Job Co" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "fixture company failed");

    Ok(Fixture { token, handle })
}

async fn create_job(
    server: &common::TestServer,
    fx: &Fixture,
    title: &str,
    salary: f64,
) -> Result<i64> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/jobs", server.base_url))
        .json(&json!({
            "_token": fx.token,
            "title": title,
            "salary": salary,
            "equity": 0.1,
            "company_handle": fx.handle,
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "job create failed");
    let payload = res.json::<serde_json::Value>().await?;
    payload["job"]["id"]
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("job id missing: {}", payload))
}

#[tokio::test]
async fn job_lifecycle() -> Result<()> {
    if !common::db_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let fx = fixture(server).await?;

    let id = create_job(server, &fx, "Backend Engineer", 120000.0).await?;

    // Get: job plus owning company profile
    let res = client
        .get(format!("{}/jobs/{}?_token={}", server.base_url, id, fx.token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["job"]["title"].as_str(), Some("Backend Engineer"));
    assert_eq!(payload["job"]["company"]["name"].as_str(), Some("Job Co"));

    // Partial update
    let res = client
        .patch(format!("{}/jobs/{}", server.base_url, id))
        .json(&json!({ "_token": fx.token, "salary": 130000.0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["job"]["salary"].as_f64(), Some(130000.0));
    assert_eq!(payload["job"]["title"].as_str(), Some("Backend Engineer"));

    // Changing the id is rejected before any store call
    let res = client
        .patch(format!("{}/jobs/{}", server.base_url, id))
        .json(&json!({ "_token": fx.token, "id": 999, "title": "Other" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(
        payload["error"]["messages"][0].as_str(),
        Some("You are not allowed to change the ID.")
    );

    // Remove twice: success then not found
    let res = client
        .delete(format!("{}/jobs/{}", server.base_url, id))
        .json(&json!({ "_token": fx.token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client
        .delete(format!("{}/jobs/{}", server.base_url, id))
        .json(&json!({ "_token": fx.token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn listing_filters_by_minimum_salary() -> Result<()> {
    if !common::db_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let fx = fixture(server).await?;

    let low_title = common::unique("junior");
    let high_title = common::unique("staff");
    create_job(server, &fx, &low_title, 50000.0).await?;
    create_job(server, &fx, &high_title, 180000.0).await?;

    let res = client
        .get(format!(
            "{}/jobs?min_salary=100000&_token={}",
            server.base_url, fx.token
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    let titles: Vec<&str> = payload["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|j| j["title"].as_str())
        .collect();
    assert!(titles.contains(&high_title.as_str()));
    assert!(!titles.contains(&low_title.as_str()));

    Ok(())
}

#[tokio::test]
async fn job_for_unknown_company_is_not_found() -> Result<()> {
    if !common::db_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let fx = fixture(server).await?;

    let res = client
        .post(format!("{}/jobs", server.base_url))
        .json(&json!({
            "_token": fx.token,
            "title": "Ghost Role",
            "company_handle": "no-such-company",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn applying_twice_conflicts() -> Result<()> {
    if !common::db_available() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let fx = fixture(server).await?;

    let id = create_job(server, &fx, "Apply Target", 90000.0).await?;
    let applicant = common::unique("applicant");
    let applicant_token = common::register_user(server, &applicant, false).await?;

    let res = client
        .post(format!("{}/jobs/{}/apply", server.base_url, id))
        .json(&json!({ "_token": applicant_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["application"]["state"].as_str(), Some("applied"));
    assert_eq!(
        payload["application"]["username"].as_str(),
        Some(applicant.as_str())
    );

    let res = client
        .post(format!("{}/jobs/{}/apply", server.base_url, id))
        .json(&json!({ "_token": applicant_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
