//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "haggle")]
#[command(about = "Haggle - time-boxed price negotiation engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted negotiation against an in-memory engine
    Demo {
        /// Supplier cost before markup
        #[arg(short, long)]
        net_rate: f64,

        /// Minimum markup percentage
        #[arg(long, default_value = "5.0")]
        markup_min: f64,

        /// Maximum markup percentage
        #[arg(long, default_value = "20.0")]
        markup_max: f64,

        /// Promo discount applied to the band
        #[arg(long, default_value = "0.0")]
        promo_discount: f64,

        /// Kind of inventory being negotiated
        #[arg(short, long, value_enum, default_value = "hotel")]
        booking_type: BookingKind,

        /// Item identifier
        #[arg(short, long, default_value = "demo-item")]
        item_id: String,

        /// Offers to submit, in order
        #[arg(short, long, value_delimiter = ',', required = true)]
        offers: Vec<f64>,

        /// Accept the last counter offer if the offers run out
        #[arg(short, long)]
        accept_counter: bool,
    },

    /// Print the acceptable price band for the given pricing inputs
    Band {
        /// Supplier cost before markup
        #[arg(short, long)]
        net_rate: f64,

        /// Minimum markup percentage
        #[arg(long, default_value = "5.0")]
        markup_min: f64,

        /// Maximum markup percentage
        #[arg(long, default_value = "20.0")]
        markup_max: f64,

        /// Promo discount applied to the band
        #[arg(long, default_value = "0.0")]
        promo_discount: f64,
    },
}

/// Booking type as a CLI value
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BookingKind {
    Flight,
    Hotel,
}

impl From<BookingKind> for crate::types::BookingType {
    fn from(kind: BookingKind) -> Self {
        match kind {
            BookingKind::Flight => crate::types::BookingType::Flight,
            BookingKind::Hotel => crate::types::BookingType::Hotel,
        }
    }
}
