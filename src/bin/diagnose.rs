use advent_board::config::BoardConfig;
use advent_board::models::Event;
use advent_board::scoring::compute_standings;
use advent_board::source::LeaderboardClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 advent_board - Diagnostics Tool");
    println!("====================================");
    println!();

    // Test 1: configuration
    println!("Test 1: Loading configuration...");
    let config = match BoardConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            println!("❌ {}", e);
            println!("   Run `advent_board create-env` for a template");
            return Ok(());
        }
    };

    println!("✅ Configuration loaded");
    println!("   Leaderboard: {}", config.leaderboard_id);
    println!("   Year: {}", config.year);
    println!("   Upstream: {}", config.base_url);
    println!(
        "   🔑 Session: {}...",
        config.session_cookie.chars().take(6).collect::<String>()
    );
    if config.debug {
        println!("   ⚠️  AOC_DEBUG is set; the server would not contact upstream");
    }
    println!();

    // Test 2: upstream response
    println!("Test 2: Fetching leaderboard...");
    let client = LeaderboardClient::new(config.session_cookie.clone(), config.base_url.clone())?;
    println!("   URL: {}", client.leaderboard_url(config.year, config.leaderboard_id));

    let body = match client.fetch_raw(config.year, config.leaderboard_id).await {
        Ok(body) => body,
        Err(e) => {
            println!("❌ Fetch failed");
            println!("   {}", e);
            println!("   An expired session cookie usually shows up as a redirect or 5xx status");
            return Ok(());
        }
    };
    println!("✅ Received {} bytes", body.len());
    println!();

    // Test 3: payload shape
    println!("Test 3: Parsing payload...");
    let event = match Event::from_json(&body) {
        Ok(event) => event,
        Err(e) => {
            println!("❌ Payload did not parse");
            println!("   {}", e);
            println!("   Start of body: {}", body.chars().take(200).collect::<String>());
            return Ok(());
        }
    };
    println!("✅ Event {} with {} members", event.year, event.members.len());
    println!();

    // Test 4: scoring
    println!("Test 4: Computing standings...");
    let standings = compute_standings(&event, config.year);
    println!("✅ Standings computed");
    println!("   Latest day: {}", standings.max_day);
    println!("   Members with every day completed: {}", standings.totals.len());
    println!("   Completed member-days: {}", standings.top_scores.len());
    println!();

    println!("====================================");
    println!("✅ All checks passed!");
    println!("====================================");
    println!();
    println!("If pages still show 'not loaded yet', check:");
    println!("  1. The server is running: ps aux | grep advent_board");
    println!("  2. Check logs: tail -f logs/advent_board_*.log");
    println!("  3. Run with debug: RUST_LOG=debug ./target/release/advent_board serve");
    println!();

    Ok(())
}
