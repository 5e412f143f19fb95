use crate::helpers::spawn_app;

#[tokio::test]
async fn create_user_returns_201_and_the_persisted_record() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/users",
            &serde_json::json!({
                "first_name": "John",
                "last_name": "Doe",
                "email": "johndoe@gmail.com",
            }),
        )
        .await;

    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(true, body["success"]);
    assert_eq!("User created successfully", body["message"]);
    assert_eq!("John", body["data"]["first_name"]);
    assert_eq!("Doe", body["data"]["last_name"]);
    assert_eq!("johndoe@gmail.com", body["data"]["email"]);
    assert!(body["data"]["id"].is_i64());
}

#[tokio::test]
async fn a_created_user_round_trips_through_get_by_id() {
    let app = spawn_app().await;

    let id = app.seed_user("Jane", "Doe", "janedoe@gmail.com").await;

    let response = app.get(&format!("/api/users/{}", id)).await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(id, body["data"]["id"].as_i64().unwrap());
    assert_eq!("Jane", body["data"]["first_name"]);
    assert_eq!("Doe", body["data"]["last_name"]);
    assert_eq!("janedoe@gmail.com", body["data"]["email"]);
}

#[tokio::test]
async fn an_email_outside_the_allowed_domain_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/users",
            &serde_json::json!({
                "first_name": "John",
                "last_name": "Doe",
                "email": "johndoe@test.fr",
            }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(false, body["success"]);
    assert_eq!("Only @gmail.com emails are allowed", body["message"]);
}

#[tokio::test]
async fn a_malformed_email_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/users",
            &serde_json::json!({
                "first_name": "John",
                "last_name": "Doe",
                "email": "not-an-email",
            }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("Invalid email format", body["message"]);
}

#[tokio::test]
async fn a_duplicate_email_is_rejected() {
    let app = spawn_app().await;

    app.seed_user("John", "Doe", "johndoe@gmail.com").await;

    let response = app
        .post(
            "/api/users",
            &serde_json::json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "johndoe@gmail.com",
            }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("Email already exists", body["message"]);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&app.connection_pool)
        .await
        .expect("Failed to count users");
    assert_eq!(1, count);
}

#[tokio::test]
async fn a_body_missing_required_fields_is_rejected_before_the_service() {
    let app = spawn_app().await;

    let response = app
        .post("/api/users", &serde_json::json!({"first_name": "John"}))
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(false, body["success"]);
}

#[tokio::test]
async fn an_empty_first_name_is_rejected_with_the_violation_list() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/users",
            &serde_json::json!({
                "first_name": "",
                "last_name": "Doe",
                "email": "johndoe@gmail.com",
            }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("Validation error", body["message"]);
    assert_eq!("first_name must not be empty", body["errors"][0]);
}

#[tokio::test]
async fn every_operation_returns_404_for_an_unknown_user_id() {
    let app = spawn_app().await;

    let get = app.get("/api/users/9999").await;
    let put = app
        .put("/api/users/9999", &serde_json::json!({"first_name": "Jo"}))
        .await;
    let patch = app
        .patch("/api/users/9999", &serde_json::json!({"first_name": "Jo"}))
        .await;
    let delete = app.delete("/api/users/9999").await;

    for response in [get, put, patch, delete] {
        assert_eq!(404, response.status().as_u16());

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!("User not found", body["message"]);
    }
}

#[tokio::test]
async fn pagination_windows_the_users_and_reports_the_page_count() {
    let app = spawn_app().await;

    for i in 0..12 {
        app.seed_user("User", "Test", &format!("user{}@gmail.com", i))
            .await;
    }

    let response = app.get("/api/users?page=2&limit=5").await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(5, body["data"].as_array().unwrap().len());
    assert_eq!(2, body["pagination"]["page"]);
    assert_eq!(5, body["pagination"]["limit"]);
    assert_eq!(12, body["pagination"]["total"]);
    assert_eq!(3, body["pagination"]["pages"]);
}

#[tokio::test]
async fn put_applies_the_provided_fields_and_rechecks_the_email_policy() {
    let app = spawn_app().await;

    let id = app.seed_user("John", "Doe", "johndoe@gmail.com").await;

    let response = app
        .put(
            &format!("/api/users/{}", id),
            &serde_json::json!({
                "first_name": "Johnny",
                "last_name": "Doe",
                "email": "johnnydoe@gmail.com",
            }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("User updated successfully", body["message"]);
    assert_eq!("Johnny", body["data"]["first_name"]);
    assert_eq!("johnnydoe@gmail.com", body["data"]["email"]);
}

#[tokio::test]
async fn put_rejects_an_email_already_taken_by_another_user() {
    let app = spawn_app().await;

    app.seed_user("John", "Doe", "johndoe@gmail.com").await;
    let other = app.seed_user("Jane", "Doe", "janedoe@gmail.com").await;

    let response = app
        .put(
            &format!("/api/users/{}", other),
            &serde_json::json!({"email": "johndoe@gmail.com"}),
        )
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("Email already exists", body["message"]);
}

#[tokio::test]
async fn put_keeps_the_email_when_resubmitting_the_same_value() {
    let app = spawn_app().await;

    let id = app.seed_user("John", "Doe", "johndoe@gmail.com").await;

    // The uniqueness check excludes the row's own id.
    let response = app
        .put(
            &format!("/api/users/{}", id),
            &serde_json::json!({"email": "johndoe@gmail.com"}),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn patch_updates_only_the_given_fields() {
    let app = spawn_app().await;

    let id = app.seed_user("John", "Doe", "johndoe@gmail.com").await;

    let response = app
        .patch(
            &format!("/api/users/{}", id),
            &serde_json::json!({"first_name": "Johnny"}),
        )
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("Johnny", body["data"]["first_name"]);
    assert_eq!("Doe", body["data"]["last_name"]);
    assert_eq!("johndoe@gmail.com", body["data"]["email"]);
}

#[tokio::test]
async fn patch_with_an_empty_body_is_rejected_before_the_service() {
    let app = spawn_app().await;

    let id = app.seed_user("John", "Doe", "johndoe@gmail.com").await;

    let response = app
        .patch(&format!("/api/users/{}", id), &serde_json::json!({}))
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("Validation error", body["message"]);
}

#[tokio::test]
async fn delete_removes_the_user() {
    let app = spawn_app().await;

    let id = app.seed_user("John", "Doe", "johndoe@gmail.com").await;

    let response = app.delete(&format!("/api/users/{}", id)).await;
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("User deleted successfully", body["message"]);

    let response = app.get(&format!("/api/users/{}", id)).await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn updating_a_just_deleted_user_returns_404_not_500() {
    let app = spawn_app().await;

    let id = app.seed_user("John", "Doe", "johndoe@gmail.com").await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id as i32)
        .execute(&app.connection_pool)
        .await
        .expect("Failed to delete user");

    let response = app
        .put(
            &format!("/api/users/{}", id),
            &serde_json::json!({"first_name": "Johnny"}),
        )
        .await;

    assert_eq!(404, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("User not found", body["message"]);
}

#[tokio::test]
async fn the_aggregate_read_nests_each_users_addresses() {
    let app = spawn_app().await;

    let id = app.seed_user("John", "Doe", "johndoe@gmail.com").await;
    app.seed_address(id, "110001").await;
    app.seed_address(id, "110002").await;
    app.seed_user("Jane", "Doe", "janedoe@gmail.com").await;

    let response = app.get("/api/users-with-addresses").await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let users = body["data"].as_array().unwrap();
    assert_eq!(2, users.len());

    let john = users
        .iter()
        .find(|u| u["id"].as_i64() == Some(id))
        .expect("Seeded user missing from the aggregate");
    let addresses = john["addresses"].as_array().unwrap();
    assert_eq!(2, addresses.len());
    assert!(addresses.iter().all(|a| a["street"].is_string()
        && a["city"].is_string()
        && a["state"].is_string()
        && a["pincode"].is_string()));
}
