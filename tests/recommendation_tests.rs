use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use recipe_recommender::config::RecommenderConfig;
use recipe_recommender::error::RecommendError;
use recipe_recommender::matching::{calculate_match_score, FuzzyMatcher};
use recipe_recommender::recipe::{IngredientEntry, Recipe};
use recipe_recommender::recommender::{dedup_by_name, RecommendMethod, Recommender};

const PANTRY: &[&str] = &[
    "banana", "milk", "egg", "flour", "sugar", "butter", "onion", "tomato", "garlic", "cheese",
    "rice", "beef", "chicken", "lemon", "basil", "carrot",
];

fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
    Recipe::new(
        name,
        ingredients.iter().map(|i| IngredientEntry::named(i)).collect(),
    )
}

fn random_corpus(rng: &mut StdRng, size: usize) -> Vec<Recipe> {
    (0..size)
        .map(|i| {
            let count = rng.gen_range(1..=5);
            let ingredients: Vec<&str> = PANTRY.choose_multiple(rng, count).copied().collect();
            // Small name space so duplicates occur
            let name = format!("Dish {}", i % (size / 2).max(1));
            recipe(&name, &ingredients)
        })
        .collect()
}

#[test]
fn test_banana_scenario() {
    let recipes = vec![
        recipe("Banana Bread", &["banana", "flour", "egg", "butter"]),
        recipe("Beef Stir Fry", &["beef", "soy sauce", "garlic"]),
    ];
    let recommender = Recommender::new(&RecommenderConfig::default());
    let results = recommender
        .recommend(&["banana"], &recipes, RecommendMethod::Hybrid, None)
        .unwrap();

    assert_eq!(results.len(), 1);
    let r1 = &results[0];
    assert_eq!(r1.name(), "Banana Bread");
    assert_eq!(r1.match_score, Some(1.0));
    let similarity = r1.similarity_score.unwrap();
    assert!(similarity > 0.0 && similarity <= 1.0);
    let expected = 0.9 * 1.0 + 0.1 * similarity;
    assert!((r1.hybrid_score.unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_hybrid_score_blends_match_and_similarity() {
    let recipes = vec![
        recipe("Omelette", &["egg", "milk", "butter"]),
        recipe("Custard", &["egg", "milk", "sugar", "vanilla"]),
        recipe("Scrambled Eggs", &["eggs", "salt"]),
    ];
    let user = ["egg", "milk"];

    for alpha in [0.0, 0.3, 0.9, 1.0] {
        let recommender = Recommender::default().with_alpha(alpha);
        let results = recommender.hybrid_recommendation(&user, &recipes, 10);
        assert_eq!(results.len(), 3);
        for scored in &results {
            let match_score = scored.match_score.unwrap();
            let similarity = scored.similarity_score.unwrap();
            let expected = alpha * match_score + (1.0 - alpha) * similarity;
            assert!(
                (scored.hybrid_score.unwrap() - expected).abs() < 1e-12,
                "{} at alpha {}",
                scored.name(),
                alpha
            );
        }
    }

    // alpha = 1 ranks purely by ingredient match
    let by_match = Recommender::default()
        .with_alpha(1.0)
        .hybrid_recommendation(&user, &recipes, 10);
    assert_eq!(by_match[2].name(), "Scrambled Eggs");
    assert_eq!(by_match[2].hybrid_score, Some(0.5));
}

#[test]
fn test_plural_matching_and_mismatch() {
    let matcher = FuzzyMatcher::default();
    assert!(matcher.matches("tomato", "tomatoes"));
    assert!(!matcher.matches("beef", "chicken"));
}

#[test]
fn test_empty_list_rejected_for_every_method() {
    let recommender = Recommender::default();
    let recipes = vec![recipe("Toast", &["bread"])];
    for method in [
        RecommendMethod::Hybrid,
        RecommendMethod::Content,
        RecommendMethod::Ingredient,
    ] {
        let result = recommender.recommend(&[] as &[String], &recipes, method, None);
        assert_eq!(result.unwrap_err(), RecommendError::NoIngredients);
    }
}

#[test]
fn test_dedup_is_idempotent_on_random_corpora() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let size = rng.gen_range(0..30);
        let corpus = random_corpus(&mut rng, size);
        let once = dedup_by_name(&corpus);
        let twice = dedup_by_name(&once);
        assert_eq!(once, twice);
        assert!(once.len() <= corpus.len());
    }
}

#[test]
fn test_hybrid_never_returns_zero_match_recipes() {
    let mut rng = StdRng::seed_from_u64(42);
    let matcher = FuzzyMatcher::default();
    for _ in 0..50 {
        let corpus = random_corpus(&mut rng, 20);
        let count = rng.gen_range(1..=4);
        let user: Vec<String> = PANTRY
            .choose_multiple(&mut rng, count)
            .map(|s| s.to_string())
            .collect();
        let alpha: f64 = rng.gen_range(0.0..=1.0);

        let recommender = Recommender::new(&RecommenderConfig::default()).with_alpha(alpha);
        let results = recommender
            .recommend(user.as_slice(), &corpus, RecommendMethod::Hybrid, Some(100))
            .unwrap();

        for scored in &results {
            let score = calculate_match_score(user.as_slice(), &scored.recipe, &matcher);
            assert!(score > 0.0, "zero-match recipe {} returned", scored.name());
            assert_eq!(scored.match_score, Some(score));
            assert!((0.0..=1.0).contains(&score));
        }
        let hybrid: Vec<f64> = results.iter().map(|r| r.hybrid_score.unwrap()).collect();
        assert!(hybrid.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn test_match_score_is_share_of_user_ingredients() {
    let matcher = FuzzyMatcher::default();
    let r = recipe("Pancakes", &["flour", "milk", "eggs", "sugar", "butter", "salt"]);
    assert_eq!(calculate_match_score(&["egg", "banana"], &r, &matcher), 0.5);
    assert_eq!(calculate_match_score(&["beef"], &r, &matcher), 0.0);
}
