//! Restaurant table parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_records()      → Vec<Record>
//!          └─ RestaurantColumns::locate() (header row)
//!               └─ parse_restaurant()  → Restaurant (per data row)

use makan_core::restaurant::{
  PLACEHOLDER_IMAGE, PriceRange, PrivateRoom, Restaurant,
};

use crate::error::{Error, Result};

// ─── Records ─────────────────────────────────────────────────────────────────

/// One logical CSV record and the line it starts on.
#[derive(Debug)]
pub(crate) struct Record {
  pub line:   usize,
  pub fields: Vec<String>,
}

/// Split `input` into records per RFC 4180.
///
/// Accepts LF or CRLF line endings, a leading byte-order mark, and quoted
/// fields spanning several lines. Blank lines are skipped.
pub(crate) fn split_records(input: &str) -> Result<Vec<Record>> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);

  let mut records = Vec::new();
  let mut fields = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut line = 1usize;
  let mut record_line = 1usize;
  let mut quote_line = 1usize;

  let mut chars = input.chars().peekable();
  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' if chars.peek() == Some(&'"') => {
          chars.next();
          field.push('"');
        }
        '"' => in_quotes = false,
        '\n' => {
          line += 1;
          field.push('\n');
        }
        _ => field.push(c),
      }
      continue;
    }

    match c {
      '"' => {
        in_quotes = true;
        quote_line = line;
      }
      ',' => fields.push(std::mem::take(&mut field)),
      '\r' if chars.peek() == Some(&'\n') => {}
      '\n' => {
        fields.push(std::mem::take(&mut field));
        push_record(&mut records, record_line, std::mem::take(&mut fields));
        line += 1;
        record_line = line;
      }
      _ => field.push(c),
    }
  }

  if in_quotes {
    return Err(Error::UnterminatedQuote { line: quote_line });
  }
  if !field.is_empty() || !fields.is_empty() {
    fields.push(field);
    push_record(&mut records, record_line, fields);
  }
  Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
  let blank = fields.len() == 1 && fields[0].trim().is_empty();
  if !blank {
    records.push(Record { line, fields });
  }
}

// ─── Header ──────────────────────────────────────────────────────────────────

/// Field positions resolved from the header row.
struct RestaurantColumns {
  width:        usize,
  name:         usize,
  cuisine:      usize,
  location:     usize,
  rating:       usize,
  price_range:  usize,
  description:  usize,
  image:        usize,
  address:      usize,
  private_room: Option<usize>,
  max_capacity: Option<usize>,
}

impl RestaurantColumns {
  fn locate(header: &[String]) -> Result<Self> {
    let find = |name: &'static str| {
      header.iter().position(|h| h.trim() == name)
    };
    let require = |name: &'static str| find(name).ok_or(Error::MissingColumn(name));

    Ok(Self {
      width:        header.len(),
      name:         require("Name")?,
      cuisine:      require("Cuisine")?,
      location:     require("Location")?,
      rating:       require("Rating")?,
      price_range:  require("Price Range")?,
      description:  require("Description")?,
      image:        require("Image")?,
      address:      require("Address")?,
      private_room: find("Private Room"),
      max_capacity: find("Max Capacity"),
    })
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

pub(crate) fn parse_restaurants(input: &str) -> Result<Vec<Restaurant>> {
  let mut records = split_records(input)?.into_iter();
  let header = records.next().ok_or(Error::Empty)?;
  let columns = RestaurantColumns::locate(&header.fields)?;

  records.map(|record| parse_restaurant(&columns, record)).collect()
}

fn parse_restaurant(cols: &RestaurantColumns, record: Record) -> Result<Restaurant> {
  let line = record.line;
  if record.fields.len() != cols.width {
    return Err(Error::FieldCount {
      line,
      expected: cols.width,
      found: record.fields.len(),
    });
  }
  let mut fields = record.fields;
  let mut take = |i: usize| std::mem::take(&mut fields[i]);
  let row_error = |source| Error::Row { line, source };

  let name = take(cols.name).trim().to_owned();
  if name.is_empty() {
    return Err(row_error(makan_core::Error::MissingField("Name")));
  }

  let raw_rating = take(cols.rating);
  let rating: f64 = raw_rating.trim().parse().map_err(|_| Error::InvalidField {
    line,
    column: "Rating",
    value: raw_rating.clone(),
  })?;
  if !(0.0..=5.0).contains(&rating) {
    return Err(row_error(makan_core::Error::RatingOutOfRange {
      field: "Rating",
      value: rating,
    }));
  }

  let price_range = PriceRange::parse(&take(cols.price_range)).map_err(row_error)?;

  let private_room = match cols.private_room {
    Some(i) => PrivateRoom::parse(&take(i)).map_err(row_error)?,
    None => PrivateRoom::No,
  };
  let max_capacity = match (private_room, cols.max_capacity) {
    (PrivateRoom::Yes, Some(i)) => coerce_capacity(&take(i)),
    _ => None,
  };

  let image = take(cols.image);
  let image = if image.trim().is_empty() {
    PLACEHOLDER_IMAGE.to_owned()
  } else {
    image
  };

  Ok(Restaurant {
    name,
    cuisine: take(cols.cuisine),
    location: take(cols.location),
    rating,
    price_range,
    description: take(cols.description),
    image,
    address: take(cols.address),
    private_room,
    max_capacity,
  })
}

/// Read a capacity that may have been written as a float (`16.0`).
/// Anything that is not a positive whole number yields `None`.
fn coerce_capacity(raw: &str) -> Option<u32> {
  let value: f64 = raw.trim().parse().ok()?;
  if value.is_finite()
    && value.fract() == 0.0
    && value >= 1.0
    && value <= f64::from(u32::MAX)
  {
    Some(value as u32)
  } else {
    None
  }
}
