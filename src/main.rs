use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use freshbites::{
    cart::CartLedger,
    catalog,
    checkout::{self, DeliveryOption, OrderForm},
    config::Config,
    error::AppError,
    favorites::Favorites,
    storage::FileStore,
    utils::{currency, parse_qty},
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the menu
    Menu {
        /// Category filter, "all" passes everything
        #[arg(long, default_value = "all")]
        category: String,

        /// Free-text name search
        #[arg(long, default_value = "")]
        search: String,

        /// Show only popular items
        #[arg(long)]
        popular: bool,
    },

    /// Show current special offers
    Offers,

    /// Add an item to the cart
    Add {
        id: String,

        /// Quantity, clamped to at least 1
        #[arg(long, default_value = "1")]
        qty: String,
    },

    /// Remove one of an item from the cart
    Remove { id: String },

    /// Show cart lines and totals
    Cart,

    /// Empty the cart
    Clear,

    /// Toggle an item on the favorites list
    Favorite { id: String },

    /// List favorite items
    Favorites,

    /// Place a delivery order with everything in the cart
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(long, default_value = "")]
        instructions: String,

        /// Express delivery (30 min) instead of standard (45 min)
        #[arg(long)]
        express: bool,
    },
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = Config::load();

    if let Err(e) = run(cli.command, &config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command, config: &Config) -> Result<(), AppError> {
    let store = FileStore::new(&config.data_dir);

    match command {
        Command::Menu {
            category,
            search,
            popular,
        } => {
            let entries = if popular {
                catalog::popular()
            } else {
                catalog::search(&category, &search, config.search_case)
            };

            if entries.is_empty() {
                println!("No matching items.");
            }
            for entry in entries {
                print_entry(entry);
            }
            println!("Categories: {}", catalog::categories().join(", "));
        }

        Command::Offers => {
            for offer in catalog::OFFERS {
                println!("{} [{}]", offer.title, offer.discount);
                println!("  {}", offer.description);
                println!("  Valid until: {}", offer.valid_until);
            }
        }

        Command::Add { id, qty } => {
            let entry = catalog::find(&id).ok_or_else(|| AppError::UnknownItem(id.clone()))?;
            let qty = parse_qty(&qty);

            let mut cart = CartLedger::open(store);
            cart.add_many(&id, qty)?;

            println!(
                "Added {} x {}, cart now has {} of it",
                qty,
                entry.name,
                cart.state().quantity(&id)
            );
        }

        Command::Remove { id } => {
            let mut cart = CartLedger::open(store);
            let before = cart.state().quantity(&id);
            cart.remove(&id)?;

            println!("{}", remove_message(&id, before, cart.state().quantity(&id)));
        }

        Command::Cart => {
            let cart = CartLedger::open(store);
            let lines = cart.lines();

            if lines.is_empty() {
                println!("Your cart is empty.");
                return Ok(());
            }

            for line in &lines {
                println!(
                    "{:<20} {} x {} = {}",
                    line.name,
                    currency(line.price),
                    line.qty,
                    currency(line.subtotal)
                );
            }

            let totals = cart.totals(config);
            println!("Subtotal: {}", currency(totals.subtotal));
            println!("Tax:      {}", currency(totals.tax));
            println!("Total:    {}", currency(totals.total));
        }

        Command::Clear => {
            let mut cart = CartLedger::open(store);
            cart.clear()?;
            println!("Cart cleared.");
        }

        Command::Favorite { id } => {
            catalog::find(&id).ok_or_else(|| AppError::UnknownItem(id.clone()))?;

            let mut favorites = Favorites::open(store);
            if favorites.toggle(&id)? {
                println!("Added {id} to favorites");
            } else {
                println!("Removed {id} from favorites");
            }
        }

        Command::Favorites => {
            let favorites = Favorites::open(store);

            if favorites.ids().is_empty() {
                println!("No favorites yet.");
            }
            for id in favorites.ids() {
                match catalog::find(id) {
                    Some(entry) => println!("{}: {}", entry.name, currency(entry.price)),
                    None => println!("{id} (no longer on the menu)"),
                }
            }
        }

        Command::Checkout {
            name,
            email,
            phone,
            address,
            instructions,
            express,
        } => {
            let form = OrderForm {
                name,
                email,
                phone,
                address,
                instructions,
            };
            let option = if express {
                DeliveryOption::Express
            } else {
                DeliveryOption::Standard
            };

            let mut cart = CartLedger::open(store);
            let receipt = checkout::place_order(&mut cart, &form, option, config)?;

            println!("Order placed!");
            for line in &receipt.lines {
                println!("  {} x {} = {}", line.name, line.qty, currency(line.subtotal));
            }
            println!("Subtotal:     {}", currency(receipt.subtotal));
            println!("Tax:          {}", currency(receipt.tax));
            println!("Delivery fee: {}", currency(receipt.delivery_fee));
            println!("Total:        {}", currency(receipt.total));
            println!(
                "Estimated delivery: {}",
                receipt.estimated_delivery.format("%H:%M")
            );
        }
    }

    Ok(())
}

fn remove_message(id: &str, before: u32, after: u32) -> String {
    if before == 0 {
        format!("{id} is not in the cart")
    } else if after == 0 {
        format!("Removed {id} from the cart")
    } else {
        format!("Removed one {id}, {after} left")
    }
}

fn print_entry(entry: &catalog::MenuEntry) {
    let marker = if entry.popular { " *popular*" } else { "" };

    println!("{}: {}{}", entry.name, currency(entry.price), marker);
    println!("  {}", entry.description);
    println!(
        "  {:.1} stars ({} reviews), {}, tags: {}  [{}]",
        entry.rating,
        entry.reviews,
        entry.prep_time,
        entry.tags.join(", "),
        entry.id
    );
}
