use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rental_scout::api::{
    FilterCriteria, FilterField, PropertyApi, PropertyType, SortKey, AMENITIES,
};
use rental_scout::listing::{to_cents, ListingView, MapView, PriceBoard};
use rental_scout::models::{DateRange, PriceQuote, PropertySummary};
use rental_scout::{Config, ListingController, MapBridge, RentalApiClient};

#[derive(Parser)]
#[command(name = "rental-scout", about = "Browse the rental marketplace from the terminal")]
struct Cli {
    /// Backend base URL, overrides config and RENTAL_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the listing with filters, pricing every card for the chosen dates
    Search(SearchArgs),
    /// Search, then click the map at a point to search around it
    Pick {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[command(flatten)]
        filters: SearchArgs,
    },
    /// Show one property in full
    Detail { id: u64 },
    /// Properties around a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Raw availability for a property
    Availability { id: u64 },
    /// Choices offered by the filter form
    Options,
    /// Dynamic price for a stay
    Price {
        id: u64,
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
    },
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long = "type")]
    property_type: Option<PropertyType>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
    #[arg(long)]
    bedrooms: Option<u32>,
    #[arg(long)]
    min_bedrooms: Option<u32>,
    #[arg(long)]
    bathrooms: Option<Decimal>,
    #[arg(long)]
    min_bathrooms: Option<Decimal>,
    /// Repeat to toggle several amenities
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    #[arg(long)]
    guests: Option<u32>,
    #[arg(long)]
    check_in: Option<NaiveDate>,
    #[arg(long)]
    check_out: Option<NaiveDate>,
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,
    #[arg(long)]
    radius: Option<f64>,
    /// e.g. -created_at, base_price_per_night, -name
    #[arg(long, allow_hyphen_values = true)]
    ordering: Option<SortKey>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
    /// Write the fetched page as JSON
    #[arg(long)]
    save: Option<PathBuf>,
}

impl SearchArgs {
    fn changes(&self) -> Vec<FilterField> {
        let mut changes = vec![
            FilterField::Search(self.search.clone()),
            FilterField::PropertyType(self.property_type),
            FilterField::City(self.city.clone()),
            FilterField::Country(self.country.clone()),
            FilterField::MinPrice(self.min_price),
            FilterField::MaxPrice(self.max_price),
            FilterField::Bedrooms(self.bedrooms),
            FilterField::MinBedrooms(self.min_bedrooms),
            FilterField::Bathrooms(self.bathrooms),
            FilterField::MinBathrooms(self.min_bathrooms),
            FilterField::MaxGuests(self.guests),
            FilterField::CheckIn(self.check_in),
            FilterField::CheckOut(self.check_out),
            FilterField::Latitude(self.latitude),
            FilterField::Longitude(self.longitude),
            FilterField::Radius(self.radius),
            FilterField::Ordering(self.ordering),
            FilterField::Page(self.page),
        ];
        if let Some(size) = self.page_size {
            changes.push(FilterField::PageSize(Some(size)));
        }
        changes
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let api = Arc::new(RentalApiClient::new(&config)?);
    info!("Rental Scout using {}", api.base_url());

    match cli.command {
        Command::Search(args) => {
            search(&config, api, &args, None).await?;
        }
        Command::Pick { lat, lng, filters } => {
            search(&config, api, &filters, Some((lat, lng))).await?;
        }
        Command::Detail { id } => detail(api.as_ref(), id).await?,
        Command::Nearby { lat, lng, radius } => {
            let radius = radius.unwrap_or(config.default_radius_km);
            let nearby = api
                .nearby(lat, lng, radius)
                .await
                .context("Failed to fetch nearby properties")?;
            println!(
                "{} properties within {} km of ({}, {})",
                nearby.count, nearby.radius_km, nearby.center.latitude, nearby.center.longitude
            );
            for (i, property) in nearby.results.iter().enumerate() {
                print_summary(i, property);
                println!("   {} {}/night", property.base_price_per_night, property.currency);
                println!();
            }
        }
        Command::Availability { id } => {
            let availability = api
                .availability(id)
                .await
                .context("Failed to fetch availability")?;
            println!("{}", serde_json::to_string_pretty(&availability)?);
        }
        Command::Options => print_options(),
        Command::Price {
            id,
            check_in,
            check_out,
        } => match api.calculate_price(id, DateRange::new(check_in, check_out)).await {
            Ok(calc) => {
                for day in &calc.daily_breakdown {
                    println!(
                        "{}  {} x {} = {}  {}",
                        day.date,
                        day.base_price,
                        day.multiplier,
                        day.final_price,
                        day.pricing_rule.as_deref().unwrap_or("")
                    );
                }
                let quote = PriceQuote::from(calc);
                println!(
                    "{} nights: {:.2} {} total · {:.2} {}/night avg",
                    quote.nights,
                    to_cents(quote.total),
                    quote.currency,
                    to_cents(quote.average_per_night),
                    quote.currency
                );
            }
            Err(err) => {
                warn!("Error calculating price: {}", err);
                println!("No quote available for property {id}");
            }
        },
    }

    Ok(())
}

async fn search(
    config: &Config,
    api: Arc<RentalApiClient>,
    args: &SearchArgs,
    click: Option<(f64, f64)>,
) -> Result<()> {
    let initial = FilterCriteria {
        page_size: Some(config.page_size),
        ..FilterCriteria::default()
    };
    let mut controller = ListingController::new(api.clone(), initial);
    let mut map = MapBridge::from_config(config);
    let mut prices = PriceBoard::new(api);

    let mut changes = args.changes();
    for amenity in &args.amenities {
        // Toggle against the criteria as it will be after earlier toggles
        let mut preview = controller.filters().clone();
        preview.update(changes.clone());
        changes.push(preview.amenity_toggle(amenity));
    }
    controller.update(changes).await;
    map.mount();

    if let Some((lat, lng)) = click {
        let selection = map.click(lat, lng, controller.criteria().radius);
        info!(
            "Searching within {} km of ({}, {})",
            selection.radius_km, lat, lng
        );
        controller.select_location(selection).await;
    }

    prices.sync(controller.results(), controller.date_range());
    prices.settle().await;

    info!("{}", controller.headline());
    let active = controller.criteria().active_filters();
    if !active.is_empty() {
        let labels: Vec<String> = active.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        info!("Active filters: {}", labels.join(", "));
    }

    match controller.view() {
        ListingView::Loading => println!("Loading..."),
        ListingView::NoResults => {
            println!("No properties found");
            println!("Try adjusting your filters to see more results.");
        }
        ListingView::Unavailable => {
            println!("Properties could not be loaded. Change a filter to try again.");
        }
        ListingView::Results { properties, .. } => {
            for (i, property) in properties.iter().enumerate() {
                print_summary(i, property);
                let price = prices.display(property);
                match price.nights_badge() {
                    Some(badge) => println!("   {price} ({badge})"),
                    None => println!("   {price}"),
                }
                println!();
            }
        }
    }

    if let Some(summary) = controller.pagination_summary() {
        println!("{summary}");
    }

    if let MapView::Ready(scene) = map.render(controller.results(), controller.map_center()) {
        println!(
            "Map: center ({:.4}, {:.4}), zoom {}, {} markers",
            scene.center.0,
            scene.center.1,
            scene.zoom,
            scene.markers.len()
        );
        if let Some(area) = scene.search_area {
            println!(
                "     search circle at ({:.4}, {:.4}), radius {} m",
                area.center.0,
                area.center.1,
                area.radius_meters()
            );
        }
    }

    if let Some(path) = &args.save {
        let json = serde_json::to_string_pretty(controller.results())?;
        tokio::fs::write(path, json).await?;
        info!("💾 Saved {} properties to {}", controller.results().len(), path.display());
    }

    Ok(())
}

async fn detail(api: &RentalApiClient, id: u64) -> Result<()> {
    let detail = match api.get_property(id).await {
        Ok(detail) => detail,
        Err(err) if err.status() == Some(404) => {
            println!("Property {id} not found");
            return Ok(());
        }
        Err(err) => return Err(err).with_context(|| format!("Failed to fetch property {id}")),
    };

    print_summary(0, &detail.summary);
    println!("   {}", detail.address);
    println!("   {} {}/night", detail.summary.base_price_per_night, detail.summary.currency);
    if !detail.description.is_empty() {
        println!("   {}", detail.description);
    }
    println!("   Images: {}", detail.images.len());
    for booked in &detail.unavailable_dates {
        println!("   Unavailable {} to {}", booked.check_in, booked.check_out);
    }
    if !detail.available_dates.message.is_empty() {
        println!("   {}", detail.available_dates.message);
    }
    Ok(())
}

fn print_options() {
    println!("Property types:");
    for kind in PropertyType::ALL {
        println!("  {kind}");
    }
    println!("Sort orders:");
    for key in SortKey::ALL {
        println!("  {:<22} {}", key.as_param(), key.label());
    }
    println!("Amenities:");
    for amenity in AMENITIES {
        println!("  {amenity}");
    }
}

fn print_summary(index: usize, property: &PropertySummary) {
    println!("{}. {} [{}]", index + 1, property.name, property.property_type);
    println!("   {}, {}", property.city, property.country);
    println!(
        "   {} bed · {} bath · {} guests",
        property.bedrooms, property.bathrooms, property.max_guests
    );
    if !property.amenities.is_empty() {
        let shown: Vec<&str> = property.amenities.iter().take(3).map(String::as_str).collect();
        let extra = property.amenities.len().saturating_sub(3);
        if extra > 0 {
            println!("   {} +{} more", shown.join(", "), extra);
        } else {
            println!("   {}", shown.join(", "));
        }
    }
    if let Some(distance) = property.distance {
        println!("   {distance} km away");
    }
}
