//! `makan`: command-line client and terminal browser for a makan server.
//!
//! # Usage
//!
//! ```text
//! makan search --cuisine French --min-rating 4.5
//! makan show "Les Amis"
//! makan review "Les Amis" --rating 5 --text "Superb." --reviewer Mei
//! makan export reviews
//! makan --config ~/.config/makan/config.toml browse
//! ```

mod app;
mod client;
mod form;
mod ui;
mod upload;

use std::{
  io,
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, SearchParams};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use makan_core::{
  asset::{Asset, AssetDisplay, AssetKind},
  card::RestaurantCard,
  restaurant::{NewRestaurant, PriceRange, PrivateRoom},
  review::{NewReview, Review},
  session::{GalleryCursor, SessionState},
  store::TableKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "makan", about = "Client for the Makan restaurant directory")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the makan server (default: http://localhost:3000).
  #[arg(long, env = "MAKAN_URL")]
  url: Option<String>,

  /// Admin username, used by `replace-restaurants`.
  #[arg(long, env = "MAKAN_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "MAKAN_PASSWORD")]
  password: Option<String>,

  /// Defaults to `browse`.
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive terminal browser.
  Browse,

  /// Search and filter restaurants, printing a card for each match.
  Search {
    /// Free text: `a,b` matches any term, `a&b` all, `"..."` an exact phrase.
    query: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// `$` through `$$$$`.
    #[arg(long)]
    price_range: Option<String>,
    #[arg(long)]
    min_rating: Option<f64>,
    /// `Yes` or `No`.
    #[arg(long)]
    private_room: Option<String>,
    /// Minimum private-room capacity; only meaningful with `--private-room Yes`.
    #[arg(long)]
    min_capacity: Option<u32>,
  },

  /// Print one restaurant's card, menus, gallery, and reviews.
  Show {
    name:       String,
    /// Directory to save the restaurant's PDF menus into.
    #[arg(long)]
    save_menus: Option<PathBuf>,
  },

  /// Add a restaurant to the directory.
  AddRestaurant {
    #[arg(long)]
    name: String,
    #[arg(long)]
    cuisine: String,
    #[arg(long)]
    location: String,
    #[arg(long)]
    rating: f64,
    #[arg(long, value_parser = PriceRange::parse)]
    price_range: PriceRange,
    #[arg(long)]
    description: String,
    #[arg(long)]
    address: String,
    /// Image URL; a placeholder is used when neither image option is given.
    #[arg(long)]
    image: Option<String>,
    /// PNG or JPEG file embedded as the card image.
    #[arg(long, value_name = "FILE", conflicts_with = "image")]
    image_file: Option<PathBuf>,
    #[arg(long, value_parser = PrivateRoom::parse, default_value = "No")]
    private_room: PrivateRoom,
    #[arg(long)]
    max_capacity: Option<u32>,
  },

  /// Submit a review.
  Review {
    restaurant: String,
    #[arg(long)]
    rating: f64,
    #[arg(long)]
    text: String,
    #[arg(long)]
    reviewer: String,
    #[arg(long, default_value = "")]
    department: String,
    #[arg(long, default_value = "")]
    designation: String,
  },

  /// Upload a menu (PDF, PNG, or JPEG).
  UploadMenu { restaurant: String, file: PathBuf },

  /// Upload a gallery photo (PNG or JPEG).
  UploadPhoto { restaurant: String, file: PathBuf },

  /// Download a table as CSV.
  Export {
    /// `restaurants`, `reviews`, `menus`, or `gallery`.
    table: TableKind,
    /// Output path; defaults to the server's file name for the table.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Replace the restaurant table with a CSV file (admin).
  ReplaceRestaurants { file: PathBuf },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

fn non_empty(s: String) -> Option<String> { (!s.is_empty()).then_some(s) }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // Flags and environment override the config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| non_empty(file_cfg.url))
      .unwrap_or_else(|| "http://localhost:3000".to_string()),
    username: args
      .user
      .or_else(|| non_empty(file_cfg.username))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| non_empty(file_cfg.password))
      .unwrap_or_default(),
  };
  let client = ApiClient::new(api_config)?;

  let command = args.command.unwrap_or(Command::Browse);
  if !matches!(command, Command::Browse) {
    // Logs go to stderr so command output can be piped.
    tracing_subscriber::fmt()
      .with_writer(io::stderr)
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::WARN.into())
          .from_env_lossy(),
      )
      .init();
  }
  run(client, command).await
}

// ─── Scripted commands ────────────────────────────────────────────────────────

async fn run(client: ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Browse => return browse(client).await,

    Command::Search {
      query,
      cuisine,
      location,
      price_range,
      min_rating,
      private_room,
      min_capacity,
    } => {
      let params = SearchParams {
        q: query,
        cuisine,
        location,
        price_range,
        min_rating,
        private_room,
        min_capacity,
      };
      tracing::debug!(?params, "searching");
      let restaurants = client.search(&params).await?;
      if restaurants.is_empty() {
        println!("No restaurants match the selected filters.");
      }
      for (i, r) in restaurants.iter().enumerate() {
        if i > 0 {
          println!();
        }
        print_card(&RestaurantCard::new(r), None);
      }
    }

    Command::Show { name, save_menus } => {
      let card = client.card(&name).await?;
      let reviews = client.reviews(&name).await?;
      let menus = client.assets(AssetKind::Menu, &name).await?;
      let gallery = client.assets(AssetKind::Gallery, &name).await?;

      print_card(&card, None);

      println!("\nMenus:");
      if menus.is_empty() {
        println!("  none");
      }
      for menu in &menus {
        println!("  {} ({}, {} bytes)", menu.file_name, menu.file_type, menu.size());
      }
      if let Some(dir) = save_menus {
        save_documents(&menus, &dir).await?;
      }

      match GalleryCursor::default().label(gallery.len()) {
        Some(label) => println!("\nGallery: {label}"),
        None => println!("\nGallery: no photos"),
      }
      for photo in &gallery {
        println!("  {}", photo.file_name);
      }

      println!("\nReviews:");
      if reviews.is_empty() {
        println!("  none");
      }
      for review in &reviews {
        print_review(review);
      }
    }

    Command::AddRestaurant {
      name,
      cuisine,
      location,
      rating,
      price_range,
      description,
      address,
      image,
      image_file,
      private_room,
      max_capacity,
    } => {
      let image = match image_file {
        Some(path) => Some(upload::read_image(&path).await?),
        None => image,
      };
      let created = client
        .add_restaurant(&NewRestaurant {
          name,
          cuisine,
          location,
          rating,
          price_range,
          description,
          address,
          image,
          private_room,
          max_capacity,
        })
        .await?;
      print_card(&RestaurantCard::new(&created), None);
    }

    Command::Review {
      restaurant,
      rating,
      text,
      reviewer,
      department,
      designation,
    } => {
      let review = client
        .add_review(&NewReview {
          restaurant_name: restaurant,
          rating,
          review_text: text,
          reviewer_name: reviewer,
          reviewer_department: department,
          reviewer_designation: designation,
        })
        .await?;
      let mut session = SessionState::new();
      session.review_submitted(&review.restaurant_name, review.rating);
      let card = client.card(&review.restaurant_name).await?;
      let flash = session.take_flash_for(&card.name);
      print_card(&card, flash.as_deref());
    }

    Command::UploadMenu { restaurant, file } => {
      upload(&client, AssetKind::Menu, &restaurant, &file).await?;
    }
    Command::UploadPhoto { restaurant, file } => {
      upload(&client, AssetKind::Gallery, &restaurant, &file).await?;
    }

    Command::Export { table, output } => {
      let csv = client.export(table).await?;
      let path = output.unwrap_or_else(|| PathBuf::from(table.export_file_name()));
      tokio::fs::write(&path, csv)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
      println!("Wrote {}", path.display());
    }

    Command::ReplaceRestaurants { file } => {
      let csv = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
      let replaced = client.replace_restaurants(csv).await?;
      println!("Restaurant table replaced: {replaced} rows");
    }
  }
  Ok(())
}

async fn upload(
  client: &ApiClient,
  kind: AssetKind,
  restaurant: &str,
  file: &Path,
) -> Result<()> {
  let input = upload::read_upload(restaurant, file).await?;
  let asset = client.upload(kind, &input).await?;
  println!(
    "Uploaded {} ({}) to {}'s {kind}",
    asset.file_name, asset.file_type, asset.restaurant_name
  );
  Ok(())
}

/// Write every downloadable asset in `assets` into `dir`.
async fn save_documents(assets: &[Asset], dir: &Path) -> Result<()> {
  tokio::fs::create_dir_all(dir)
    .await
    .with_context(|| format!("creating {}", dir.display()))?;
  for asset in assets {
    let AssetDisplay::Document { file_name, bytes } = asset.display() else {
      continue;
    };
    // Keep only the final component of an uploaded name.
    let Some(file_name) = Path::new(&file_name).file_name() else {
      continue;
    };
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes)
      .await
      .with_context(|| format!("writing {}", path.display()))?;
    println!("Saved {}", path.display());
  }
  Ok(())
}

fn print_card(card: &RestaurantCard, flash: Option<&str>) {
  if let Some(flash) = flash {
    println!("{flash}");
  }
  println!("{}", card.name);
  println!("  {}", card.description);
  println!("  Cuisine:      {}", card.cuisine);
  println!("  Location:     {}", card.location);
  println!("  Address:      {}", card.address);
  println!("  Rating:       {}", card.rating);
  println!("  Price:        {}", card.price);
  println!("  Private Room: {}", card.private_room);
}

fn print_review(review: &Review) {
  println!(
    "  {:.1}  {}  ({})",
    review.rating,
    review.attribution(),
    review.timestamp.format("%Y-%m-%d %H:%M")
  );
  println!("    {}", review.review_text);
}

// ─── Browser ──────────────────────────────────────────────────────────────────

async fn browse(client: ApiClient) -> Result<()> {
  let mut app = App::new(client);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let load_result = app.load_restaurants().await;

  // Run the event loop; restore terminal even on error.
  let run_result = if load_result.is_ok() {
    run_event_loop(&mut terminal, &mut app).await
  } else {
    load_result
  };

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
