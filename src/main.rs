//! Haggle CLI binary

use clap::Parser;
use haggle::bargain::PricingTerms;
use haggle::cli::{Cli, Commands, HaggleApp};
use haggle::pricing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            net_rate,
            markup_min,
            markup_max,
            promo_discount,
            booking_type,
            item_id,
            offers,
            accept_counter,
        } => {
            let app = HaggleApp::new();
            let terms = PricingTerms {
                net_rate,
                markup_min,
                markup_max,
                promo_discount,
            };

            let result = app
                .run_demo(booking_type.into(), item_id, terms, &offers, accept_counter)
                .await;
            app.shutdown();
            result?;
        }

        Commands::Band {
            net_rate,
            markup_min,
            markup_max,
            promo_discount,
        } => {
            let band = pricing::compute_band(net_rate, markup_min, markup_max, promo_discount)?;
            println!("base price:  {:.2}", band.base_price);
            println!("range min:   {:.2}", band.range_min);
            println!("range max:   {:.2}", band.range_max);
        }
    }

    Ok(())
}
