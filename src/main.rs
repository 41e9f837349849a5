use log::error;
use recipe_basket::BasketService;
use serde::Serialize;
use std::env;

const USAGE: &str = "Usage: recipe-basket <command>

Commands:
  recipe <url>                 Extract a recipe from a web page
  products <ingredient>...     Match ingredient lines to grocery products
  image <url>                  Resolve the image declared by a recipe page
  search <query>               Search recipes and resolve their images
  featured                     List featured recipes";

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let service = BasketService::from_env()?;

    let outcome = match (command.as_str(), rest) {
        ("recipe", [url]) => match service.extract_recipe(url).await {
            Ok(recipe) => print_json(&recipe),
            Err(e) => Err(e.into()),
        },
        ("products", lines) if !lines.is_empty() => {
            print_json(&service.find_products_batch(lines).await)
        }
        ("image", [url]) => match service.resolve_image(url).await {
            Ok(image) => print_json(&serde_json::json!({ "image": image })),
            Err(e) => Err(e.into()),
        },
        ("search", words) if !words.is_empty() => {
            match service.search_recipes(&words.join(" ")).await {
                Ok(recipes) => print_json(&recipes),
                Err(e) => Err(e.into()),
            }
        }
        ("featured", []) => match service.featured_recipes().await {
            Ok(recipes) => print_json(&recipes),
            Err(e) => Err(e.into()),
        },
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = &outcome {
        error!("{}", e);
    }
    outcome
}
