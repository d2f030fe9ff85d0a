//! Text-entry forms for the browser: one per [`OpenForm`].

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use makan_core::{
  asset::AssetKind,
  restaurant::{NewRestaurant, PriceRange, PrivateRoom},
  review::NewReview,
  session::OpenForm,
};

/// One labelled input line.
#[derive(Debug, Clone)]
pub struct Field {
  pub label:    &'static str,
  pub value:    String,
  pub optional: bool,
}

impl Field {
  fn required(label: &'static str) -> Self {
    Self { label, value: String::new(), optional: false }
  }

  fn optional(label: &'static str) -> Self {
    Self { label, value: String::new(), optional: true }
  }
}

/// What a filled-in form asks the server to do.
#[derive(Debug)]
pub enum Submission {
  Restaurant(NewRestaurant),
  Review(NewReview),
  Upload { kind: AssetKind, restaurant: String, path: PathBuf },
}

/// Input buffer for the open form.
#[derive(Debug, Clone)]
pub struct Form {
  pub kind:   OpenForm,
  pub fields: Vec<Field>,
  pub focus:  usize,
}

impl Form {
  pub fn new(kind: OpenForm) -> Self {
    let fields = match &kind {
      OpenForm::AddRestaurant => vec![
        Field::required("Name"),
        Field::required("Cuisine"),
        Field::required("Location"),
        Field::required("Rating"),
        Field::required("Price Range"),
        Field::required("Description"),
        Field::required("Address"),
        Field::optional("Image URL"),
        Field::optional("Private Room"),
        Field::optional("Max Capacity"),
      ],
      OpenForm::Review(_) => vec![
        Field::required("Rating"),
        Field::required("Review"),
        Field::required("Your Name"),
        Field::optional("Department"),
        Field::optional("Designation"),
      ],
      OpenForm::MenuUpload(_) | OpenForm::PhotoUpload(_) => {
        vec![Field::required("File")]
      }
    };
    Self { kind, fields, focus: 0 }
  }

  pub fn title(&self) -> String {
    match &self.kind {
      OpenForm::AddRestaurant => "Add Restaurant".to_string(),
      OpenForm::Review(name) => format!("Review {name}"),
      OpenForm::MenuUpload(name) => format!("Upload Menu for {name}"),
      OpenForm::PhotoUpload(name) => format!("Upload Photo for {name}"),
    }
  }

  pub fn focus_next(&mut self) { self.focus = (self.focus + 1) % self.fields.len(); }

  pub fn focus_prev(&mut self) {
    self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
  }

  pub fn push(&mut self, c: char) {
    if let Some(field) = self.fields.get_mut(self.focus) {
      field.value.push(c);
    }
  }

  pub fn pop(&mut self) {
    if let Some(field) = self.fields.get_mut(self.focus) {
      field.value.pop();
    }
  }

  fn value(&self, label: &str) -> &str {
    self
      .fields
      .iter()
      .find(|f| f.label == label)
      .map(|f| f.value.trim())
      .unwrap_or_default()
  }

  fn optional(&self, label: &str) -> Option<String> {
    let v = self.value(label);
    (!v.is_empty()).then(|| v.to_owned())
  }

  /// Convert the buffer into a request. Blank required fields are reported
  /// here so the form can stay open; everything else is left to the server.
  pub fn submission(&self) -> Result<Submission> {
    if let Some(field) = self
      .fields
      .iter()
      .find(|f| !f.optional && f.value.trim().is_empty())
    {
      return Err(anyhow!("{} is required", field.label));
    }

    match &self.kind {
      OpenForm::AddRestaurant => {
        let max_capacity = self
          .optional("Max Capacity")
          .map(|v| v.parse::<u32>())
          .transpose()
          .context("Max Capacity must be a whole number")?;
        Ok(Submission::Restaurant(NewRestaurant {
          name: self.value("Name").to_owned(),
          cuisine: self.value("Cuisine").to_owned(),
          location: self.value("Location").to_owned(),
          rating: parse_rating(self.value("Rating"))?,
          price_range: PriceRange::parse(self.value("Price Range"))?,
          description: self.value("Description").to_owned(),
          address: self.value("Address").to_owned(),
          image: self.optional("Image URL"),
          private_room: PrivateRoom::parse(self.value("Private Room"))?,
          max_capacity,
        }))
      }
      OpenForm::Review(name) => Ok(Submission::Review(NewReview {
        restaurant_name:      name.clone(),
        rating:               parse_rating(self.value("Rating"))?,
        review_text:          self.value("Review").to_owned(),
        reviewer_name:        self.value("Your Name").to_owned(),
        reviewer_department:  self.value("Department").to_owned(),
        reviewer_designation: self.value("Designation").to_owned(),
      })),
      OpenForm::MenuUpload(name) => Ok(Submission::Upload {
        kind:       AssetKind::Menu,
        restaurant: name.clone(),
        path:       PathBuf::from(self.value("File")),
      }),
      OpenForm::PhotoUpload(name) => Ok(Submission::Upload {
        kind:       AssetKind::Gallery,
        restaurant: name.clone(),
        path:       PathBuf::from(self.value("File")),
      }),
    }
  }
}

fn parse_rating(s: &str) -> Result<f64> {
  s.parse().context("Rating must be a number")
}
