use recipe_basket::{BasketConfig, BasketService, ScrapeError};

fn create_recipe_html(json_ld: &str, body: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            {body}
        </body>
        </html>
        "#
    )
}

fn service_for(server: &mockito::Server) -> BasketService {
    let mut config = BasketConfig::default();
    config.recipe_site.base_url = server.url();
    config.retailer.base_url = server.url();
    BasketService::new(config).unwrap()
}

#[tokio::test]
async fn test_json_ld_recipe_is_cleaned() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Garlic Butter Pasta",
        "image": ["https://cdn.example/pasta.jpg"],
        "recipeIngredient": [
            "1 lb spaghetti",
            "4 cloves garlic, minced",
            "- 2 tbsp butter",
            "ok"
        ],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "1. Boil the pasta until al dente."},
            {"@type": "HowToStep", "text": "Melt butter and add the garlic."},
            {"@type": "HowToStep", "text": "Toss."}
        ]
    }
    "#;
    let _m = server
        .mock("GET", "/recipe/garlic-pasta")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(create_recipe_html(json_ld, "<h1>Ignored</h1>"))
        .create_async()
        .await;

    let service = service_for(&server);
    let recipe = service
        .extract_recipe(&format!("{}/recipe/garlic-pasta", server.url()))
        .await
        .unwrap();

    assert_eq!(recipe.name, "Garlic Butter Pasta");
    assert_eq!(recipe.image.as_deref(), Some("https://cdn.example/pasta.jpg"));
    assert_eq!(
        recipe.ingredients,
        vec!["lb spaghetti", "cloves garlic, minced", "tbsp butter"]
    );
    assert_eq!(
        recipe.instructions,
        vec![
            ". Boil the pasta until al dente.",
            "Melt butter and add the garlic."
        ]
    );
}

#[tokio::test]
async fn test_markup_fills_missing_instructions() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Tomato Salad",
        "recipeIngredient": ["3 ripe tomatoes", "1 red onion"]
    }
    "#;
    let body = r#"
        <h1>Another Title</h1>
        <ol class="recipe-instructions">
            <li>Slice the tomatoes and onion.</li>
            <li>Season with salt and olive oil.</li>
        </ol>
    "#;
    let _m = server
        .mock("GET", "/recipe/tomato-salad")
        .with_status(200)
        .with_body(create_recipe_html(json_ld, body))
        .create_async()
        .await;

    let service = service_for(&server);
    let recipe = service
        .extract_recipe(&format!("{}/recipe/tomato-salad", server.url()))
        .await
        .unwrap();

    assert_eq!(recipe.name, "Tomato Salad");
    assert_eq!(recipe.ingredients, vec!["ripe tomatoes", "red onion"]);
    assert_eq!(
        recipe.instructions,
        vec!["Slice the tomatoes and onion.", "Season with salt and olive oil."]
    );
    assert!(recipe.image.is_none());
}

#[tokio::test]
async fn test_lowercase_recipe_type() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "recipe",
        "name": "Easy Black Bean Soup",
        "recipeIngredient": ["2 cans black beans", "1 onion, diced"],
        "recipeInstructions": "Simmer everything for thirty minutes."
    }
    "#;
    let _m = server
        .mock("GET", "/recipe/soup")
        .with_status(200)
        .with_body(create_recipe_html(json_ld, ""))
        .create_async()
        .await;

    let service = service_for(&server);
    let recipe = service
        .extract_recipe(&format!("{}/recipe/soup", server.url()))
        .await
        .unwrap();

    assert_eq!(recipe.name, "Easy Black Bean Soup");
    assert_eq!(recipe.ingredients, vec!["cans black beans", "onion, diced"]);
    assert_eq!(
        recipe.instructions,
        vec!["Simmer everything for thirty minutes."]
    );
}

#[tokio::test]
async fn test_array_type_in_graph() {
    let mut server = mockito::Server::new_async().await;
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebPage", "name": "Site"},
            {
                "@type": ["Recipe", "NewsArticle"],
                "name": "Sheet Pan Chicken",
                "recipeIngredient": ["2 chicken thighs", "1 lemon"],
                "recipeInstructions": [{"text": "Roast at 220C for 35 minutes."}]
            }
        ]
    }
    "#;
    let _m = server
        .mock("GET", "/recipe/chicken")
        .with_status(200)
        .with_body(create_recipe_html(json_ld, ""))
        .create_async()
        .await;

    let service = service_for(&server);
    let recipe = service
        .extract_recipe(&format!("{}/recipe/chicken", server.url()))
        .await
        .unwrap();

    assert_eq!(recipe.name, "Sheet Pan Chicken");
    assert_eq!(recipe.ingredients, vec!["chicken thighs", "lemon"]);
}

#[tokio::test]
async fn test_page_without_ingredients_is_extraction_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/blog/post")
        .with_status(200)
        .with_body("<html><body><h1>Ten kitchen tips</h1><p>No recipe here.</p></body></html>")
        .create_async()
        .await;

    let service = service_for(&server);
    let result = service
        .extract_recipe(&format!("{}/blog/post", server.url()))
        .await;

    assert!(matches!(result, Err(ScrapeError::ExtractionError(_))));
}

#[tokio::test]
async fn test_not_found_is_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/recipe/missing")
        .with_status(404)
        .create_async()
        .await;

    let service = service_for(&server);
    let result = service
        .extract_recipe(&format!("{}/recipe/missing", server.url()))
        .await;

    match result {
        Err(e @ ScrapeError::HttpStatus { status: 404, .. }) => assert!(e.is_fetch_error()),
        other => panic!("Expected 404 status error, got {:?}", other),
    }
}

#[test]
fn test_extract_from_html_without_fetching() {
    let html = create_recipe_html(
        r#"{"@type": "Recipe", "name": "Toast", "recipeIngredient": ["2 slices bread"]}"#,
        "",
    );

    let recipe = recipe_basket::extract_recipe_from_html(&html).unwrap();

    assert_eq!(recipe.name, "Toast");
    assert_eq!(recipe.ingredients, vec!["slices bread"]);
    assert!(recipe.instructions.is_empty());
}
