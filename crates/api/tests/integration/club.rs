use api::gql::build_schema;
use async_graphql::Variables;
use serde_json::json;
use uuid::Uuid;

use infra::repos::{clubs, CreateClubData};

use crate::common::*;

const CLUB_DETAILS: &str = r#"
    query Club($id: ID!) {
        club(id: $id) {
            id
            title
            likes
            peopleLiked
            creatorId
            isCreator
            hasLiked
            creator { id email }
        }
    }
"#;

#[tokio::test]
async fn test_create_club_and_list() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (user_id, claims) = create_test_user(&app_state, &unique_email("creator")).await;
    let title = format!("Celtic {}", Uuid::new_v4().simple());

    let create = r#"
        mutation Create($input: CreateClubInput!) {
            createClub(input: $input) { id title likes peopleLiked creatorId isCreator hasLiked }
        }
    "#;
    let variables = Variables::from_json(json!({
        "input": {
            "title": title,
            "description": "Glasgow",
            "firstPlayer": "McGregor",
            "secondPlayer": "Hatate",
            "thirdPlayer": "Kyogo",
            "imageUrl": "https://example.com/celtic.png"
        }
    }));
    let response = execute_graphql(&schema, create, Some(variables), Some(claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let created = &data["createClub"];
    assert_eq!(created["title"], title);
    assert_eq!(created["likes"], 0);
    assert_eq!(created["peopleLiked"], json!([]));
    assert_eq!(created["creatorId"], user_id.to_string());
    assert_eq!(created["isCreator"], true);
    assert_eq!(created["hasLiked"], false);
    let club_id = created["id"].as_str().unwrap().to_string();

    let response = execute_graphql(
        &schema,
        "query { clubs(limit: 100) { id isCreator } }",
        None,
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let listed = data["clubs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == club_id)
        .expect("new club should be on the first page");
    assert_eq!(listed["isCreator"], false);
}

#[tokio::test]
async fn test_club_details_flags_depend_on_viewer() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let creator_email = unique_email("owner");
    let (creator_id, creator_claims) = create_test_user(&app_state, &creator_email).await;
    let (_, visitor_claims) = create_test_user(&app_state, &unique_email("visitor")).await;
    let club_id = create_test_club(&app_state, creator_id, "Benfica").await;

    let variables = || Variables::from_json(json!({ "id": club_id.to_string() }));

    let response =
        execute_graphql(&schema, CLUB_DETAILS, Some(variables()), Some(creator_claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["club"]["isCreator"], true);
    assert_eq!(data["club"]["hasLiked"], false);
    assert_eq!(data["club"]["creator"]["email"], creator_email);

    let response =
        execute_graphql(&schema, CLUB_DETAILS, Some(variables()), Some(visitor_claims)).await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["club"]["isCreator"], false);

    let response = execute_graphql(&schema, CLUB_DETAILS, Some(variables()), None).await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["club"]["isCreator"], false);
    assert_eq!(data["club"]["hasLiked"], false);
}

#[tokio::test]
async fn test_unknown_club_is_not_found() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state);

    let variables = Variables::from_json(json!({ "id": Uuid::new_v4().to_string() }));
    let response = execute_graphql(&schema, CLUB_DETAILS, Some(variables), None).await;

    assert_eq!(error_code(&response).as_deref(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_update_club_keeps_likes_and_creator() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (creator_id, creator_claims) = create_test_user(&app_state, &unique_email("editor")).await;
    let (_, fan_claims) = create_test_user(&app_state, &unique_email("fan")).await;
    let club_id = create_test_club(&app_state, creator_id, "Porto").await;

    let like = format!(r#"mutation {{ toggleLike(clubId: "{club_id}") {{ likes }} }}"#);
    let response = execute_graphql(&schema, &like, None, Some(fan_claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let update = r#"
        mutation Update($id: ID!, $input: UpdateClubInput!) {
            updateClub(id: $id, input: $input) {
                title description firstPlayer likes peopleLiked creatorId
            }
        }
    "#;
    let variables = Variables::from_json(json!({
        "id": club_id.to_string(),
        "input": { "title": "FC Porto", "firstPlayer": "Pepe" }
    }));
    let response = execute_graphql(&schema, update, Some(variables), Some(creator_claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let updated = &data["updateClub"];
    assert_eq!(updated["title"], "FC Porto");
    assert_eq!(updated["firstPlayer"], "Pepe");
    assert_eq!(updated["description"], "Test club description");
    assert_eq!(updated["likes"], 1);
    assert_eq!(updated["peopleLiked"].as_array().unwrap().len(), 1);
    assert_eq!(updated["creatorId"], creator_id.to_string());
}

#[tokio::test]
async fn test_only_creator_can_update_or_delete() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (creator_id, _) = create_test_user(&app_state, &unique_email("owner")).await;
    let (_, intruder_claims) = create_test_user(&app_state, &unique_email("intruder")).await;
    let club_id = create_test_club(&app_state, creator_id, "Sporting").await;

    let update = format!(
        r#"mutation {{ updateClub(id: "{club_id}", input: {{ title: "Hijacked" }}) {{ id }} }}"#
    );
    let response = execute_graphql(&schema, &update, None, Some(intruder_claims.clone())).await;
    assert_eq!(error_code(&response).as_deref(), Some("FORBIDDEN"));

    let delete = format!(r#"mutation {{ deleteClub(id: "{club_id}") }}"#);
    let response = execute_graphql(&schema, &delete, None, Some(intruder_claims)).await;
    assert_eq!(error_code(&response).as_deref(), Some("FORBIDDEN"));

    let variables = Variables::from_json(json!({ "id": club_id.to_string() }));
    let response = execute_graphql(&schema, CLUB_DETAILS, Some(variables), None).await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["club"]["title"], "Sporting");
}

#[tokio::test]
async fn test_delete_club() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (creator_id, claims) = create_test_user(&app_state, &unique_email("deleter")).await;
    let club_id = create_test_club(&app_state, creator_id, "Boavista").await;

    let delete = format!(r#"mutation {{ deleteClub(id: "{club_id}") }}"#);
    let response = execute_graphql(&schema, &delete, None, Some(claims.clone())).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["deleteClub"], club_id.to_string());

    let variables = Variables::from_json(json!({ "id": club_id.to_string() }));
    let response = execute_graphql(&schema, CLUB_DETAILS, Some(variables), None).await;
    assert_eq!(error_code(&response).as_deref(), Some("NOT_FOUND"));

    let response = execute_graphql(&schema, &delete, None, Some(claims)).await;
    assert_eq!(error_code(&response).as_deref(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_search_clubs_is_case_insensitive() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (creator_id, _) = create_test_user(&app_state, &unique_email("searcher")).await;
    let marker = Uuid::new_v4().simple().to_string();
    let hit = create_test_club(&app_state, creator_id, &format!("Rangers {marker}")).await;
    create_test_club(&app_state, creator_id, "Hearts").await;

    let query = format!(
        r#"query {{ searchClubs(text: "RANGERS {}") {{ id }} }}"#,
        marker.to_uppercase()
    );
    let response = execute_graphql(&schema, &query, None, None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    assert_eq!(data["searchClubs"], json!([{ "id": hit.to_string() }]));

    let response =
        execute_graphql(&schema, r#"query { searchClubs(text: "  ") { id } }"#, None, None).await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["searchClubs"], json!([]));
}

#[tokio::test]
async fn test_search_matches_stored_non_ascii_title() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (creator_id, _) = create_test_user(&app_state, &unique_email("istanbul")).await;
    let title = format!("İstanbulspor {}", Uuid::new_v4().simple());
    let club_id = create_test_club(&app_state, creator_id, &title).await;

    let variables = Variables::from_json(json!({ "text": title }));
    let response = execute_graphql(
        &schema,
        "query Search($text: String!) { searchClubs(text: $text) { id } }",
        Some(variables),
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    assert_eq!(data["searchClubs"], json!([{ "id": club_id.to_string() }]));
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (creator_id, _) = create_test_user(&app_state, &unique_email("wild")).await;
    let marker = Uuid::new_v4().simple().to_string();
    let hit = create_test_club(&app_state, creator_id, &format!("{marker} 100%")).await;
    create_test_club(&app_state, creator_id, &format!("{marker} 1000")).await;

    let variables = Variables::from_json(json!({ "text": format!("{marker} 100%") }));
    let response = execute_graphql(
        &schema,
        "query Search($text: String!) { searchClubs(text: $text) { id } }",
        Some(variables),
        None,
    )
    .await;

    let data = response.data.into_json().unwrap();
    assert_eq!(data["searchClubs"], json!([{ "id": hit.to_string() }]));
}

#[tokio::test]
async fn test_standings_order_by_likes() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let (creator_id, _) = create_test_user(&app_state, &unique_email("table")).await;
    let marker = Uuid::new_v4().simple().to_string();

    // Rolled back at the end, so other tests never see these rows. The like
    // counts are far above anything the rest of the suite produces.
    let mut tx = app_state.db.begin().await.unwrap();
    let new_club = |title: String| CreateClubData {
        title,
        description: String::new(),
        first_player: String::new(),
        second_player: String::new(),
        third_player: String::new(),
        image_url: String::new(),
        creator: creator_id,
    };
    let runner_up = clubs::create(&mut *tx, new_club(format!("A runner-up {marker}")))
        .await
        .unwrap();
    let leader = clubs::create(&mut *tx, new_club(format!("Z leader {marker}")))
        .await
        .unwrap();
    let tied = clubs::create(&mut *tx, new_club(format!("B tied {marker}")))
        .await
        .unwrap();

    for (id, likes) in [(leader.id, 5000), (runner_up.id, 4000), (tied.id, 4000)] {
        sqlx::query(
            "UPDATE clubs \
             SET people_liked = ARRAY(SELECT gen_random_uuid() FROM generate_series(1, $2)), \
                 likes = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(likes)
        .execute(&mut *tx)
        .await
        .unwrap();
    }

    let table = clubs::standings(&mut *tx, 100).await.unwrap();
    tx.rollback().await.unwrap();

    let top: Vec<Uuid> = table.iter().take(3).map(|c| c.id).collect();
    assert_eq!(top, vec![leader.id, runner_up.id, tied.id]);
    assert_eq!(table[0].likes, 5000);
    assert!(table.windows(2).all(|w| w[0].likes >= w[1].likes));
}

#[tokio::test]
async fn test_standings_query_is_ranked() {
    let Some(app_state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(app_state.clone());
    let (creator_id, _) = create_test_user(&app_state, &unique_email("ranked")).await;
    let club_id = create_test_club(&app_state, creator_id, "Ranked").await;
    let (_, fan_claims) = create_test_user(&app_state, &unique_email("fan")).await;
    let like = format!(r#"mutation {{ toggleLike(clubId: "{club_id}") {{ likes }} }}"#);
    execute_graphql(&schema, &like, None, Some(fan_claims)).await;

    let response = execute_graphql(
        &schema,
        "query { standings(limit: 100) { id likes } }",
        None,
        None,
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let likes: Vec<i64> = data["standings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["likes"].as_i64().unwrap())
        .collect();

    assert!(!likes.is_empty());
    assert!(likes.windows(2).all(|w| w[0] >= w[1]), "not ranked: {likes:?}");
}
