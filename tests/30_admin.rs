mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use lms_api_rust::types::Role;

#[tokio::test]
async fn students_cannot_reach_admin_routes() -> Result<()> {
    let server = common::spawn_server().await?;
    let (student, _) = server.register("Sam", "sam@example.com").await?;

    let (status, body) = server.get("/api/admin/courses", Some(&student)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized as an admin");

    let (status, _) = server.get("/api/admin/courses", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn course_crud_round() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.register_with_role("Admin", "admin@example.com", Role::Admin).await?;

    let id = server.create_course(&admin, "rust-basics", "draft").await?;

    let (status, body) = server.get(&format!("/api/admin/courses/{}", id), Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "draft");

    let (status, body) = server
        .put(
            &format!("/api/admin/courses/{}", id),
            &admin,
            json!({ "status": "published", "title": "Rust Basics" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "published");
    assert_eq!(body["data"]["title"], "Rust Basics");
    assert_eq!(body["data"]["slug"], "rust-basics");

    let (status, body) = server.delete(&format!("/api/admin/courses/{}", id), &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course deleted");

    let (status, _) = server.get(&format!("/api/admin/courses/{}", id), Some(&admin)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn duplicate_slug_conflicts() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.register_with_role("Admin", "admin@example.com", Role::Admin).await?;
    server.create_course(&admin, "rust-basics", "published").await?;

    let (status, body) = server
        .post(
            "/api/admin/courses",
            Some(&admin),
            json!({
                "title": "Again",
                "slug": "Rust-Basics",
                "category": "program",
                "description": "dup",
                "shortDescription": "dup"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A course with this slug already exists");
    Ok(())
}

#[tokio::test]
async fn course_validation_errors() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.register_with_role("Admin", "admin@example.com", Role::Admin).await?;

    let (status, body) = server
        .post("/api/admin/courses", Some(&admin), json!({ "title": "No slug" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["slug"].is_string());

    let (status, _) = server
        .post(
            "/api/admin/courses",
            Some(&admin),
            json!({
                "title": "Negative",
                "slug": "negative",
                "category": "program",
                "description": "d",
                "shortDescription": "s",
                "price": -5
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.get("/api/admin/courses/not-a-uuid", Some(&admin)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn curriculum_authoring_and_listing() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.register_with_role("Admin", "admin@example.com", Role::Admin).await?;
    let course_id = server.create_course(&admin, "rust-basics", "published").await?;

    let second = server.create_module(&admin, &course_id, "Traits", 2).await?;
    let first = server.create_module(&admin, &course_id, "Ownership", 1).await?;

    let (status, body) = server.get(&format!("/api/admin/modules/{}", course_id), Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .map(|m| m.iter().filter_map(|x| x["id"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);

    server.create_video_lesson(&admin, &first, "Moves").await?;
    let (status, body) = server
        .post(
            "/api/admin/lessons",
            Some(&admin),
            json!({ "title": "Exercise", "moduleId": first, "type": "assignment", "assignmentDescription": "Fix the borrow" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["videoUrl"].is_null());

    let (status, _) = server
        .post(
            "/api/admin/lessons",
            Some(&admin),
            json!({ "title": "Broken", "moduleId": first, "type": "video" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = server.get(&format!("/api/admin/lessons/{}", first), Some(&admin)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, _) = server
        .post(
            "/api/admin/assignments",
            Some(&admin),
            json!({ "title": "Homework", "moduleId": first, "description": "Write a linked list", "dueDate": "2030-01-01T00:00:00Z" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = server
        .post(
            "/api/admin/notes",
            Some(&admin),
            json!({ "title": "Cheatsheet", "moduleId": first, "content": "  & and &mut  " }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = server.get(&format!("/api/admin/notes/{}", first), Some(&admin)).await?;
    assert_eq!(body["data"][0]["content"], "  & and &mut  ");
    let (_, body) = server.get(&format!("/api/admin/assignments/{}", first), Some(&admin)).await?;
    assert_eq!(body["data"][0]["title"], "Homework");
    Ok(())
}

#[tokio::test]
async fn field_errors_use_request_field_names() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.register_with_role("Admin", "admin@example.com", Role::Admin).await?;

    let (status, body) = server.post("/api/admin/modules", Some(&admin), json!({ "title": "M" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["courseId"], "Course id is required");
    assert!(body["field_errors"].get("course_id").is_none());

    let (status, body) = server
        .post(
            "/api/admin/courses",
            Some(&admin),
            json!({ "title": "T", "slug": "t", "category": "program", "description": "d" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["shortDescription"].is_string());
    Ok(())
}

#[tokio::test]
async fn course_update_rejects_blank_description() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.register_with_role("Admin", "admin@example.com", Role::Admin).await?;
    let id = server.create_course(&admin, "rust-basics", "published").await?;

    let (status, body) = server
        .put(&format!("/api/admin/courses/{}", id), &admin, json!({ "description": "   " }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["description"], "Description cannot be empty");
    Ok(())
}

#[tokio::test]
async fn curriculum_requires_existing_parent() -> Result<()> {
    let server = common::spawn_server().await?;
    let admin = server.register_with_role("Admin", "admin@example.com", Role::Admin).await?;
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = server
        .post("/api/admin/modules", Some(&admin), json!({ "title": "Orphan", "courseId": missing }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");

    let (status, body) = server
        .post(
            "/api/admin/notes",
            Some(&admin),
            json!({ "title": "Orphan", "moduleId": missing, "content": "x" }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Module not found");
    Ok(())
}
