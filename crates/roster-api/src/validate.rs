//! Request validation: an ordered chain of field checks that collects every
//! failure before anything reaches the store.
//!
//! Each field reports at most one error (its first failing rule), and errors
//! are listed in field declaration order.

use chrono::NaiveDate;
use roster_core::{
  envelope::FieldError,
  pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest},
  student::{NewStudent, StudentPatch, StudentStatus, parse_date},
};
use serde::Deserialize;
use validator::ValidateEmail as _;

// ─── Request shapes ──────────────────────────────────────────────────────────

/// JSON body accepted by `POST /students` and `PUT /students/:id`.
///
/// Every field arrives as an optional string so that missing and malformed
/// values are reported as field errors rather than as a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentBody {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub date_of_birth: Option<String>,
  pub address:       Option<String>,
  pub city:          Option<String>,
  pub state:         Option<String>,
  pub postal_code:   Option<String>,
  pub country:       Option<String>,
  pub status:        Option<String>,
}

/// Query string for `GET /students`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
  pub page:  Option<String>,
  pub limit: Option<String>,
}

impl PageParams {
  /// Build from raw query pairs. A repeated key keeps its first value and
  /// unknown keys are ignored.
  pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
    let mut params = Self::default();
    for (key, value) in pairs {
      let slot = match key.as_str() {
        "page" => &mut params.page,
        "limit" => &mut params.limit,
        _ => continue,
      };
      slot.get_or_insert(value);
    }
    params
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
  Required,
  Optional,
}

struct TextRule {
  field: &'static str,
  label: &'static str,
  min:   usize,
  max:   usize,
}

const FIRST_NAME: TextRule =
  TextRule { field: "first_name", label: "First name", min: 2, max: 50 };
const LAST_NAME: TextRule =
  TextRule { field: "last_name", label: "Last name", min: 2, max: 50 };
const ADDRESS: TextRule =
  TextRule { field: "address", label: "Address", min: 0, max: 255 };
const CITY: TextRule = TextRule { field: "city", label: "City", min: 0, max: 50 };
const STATE: TextRule =
  TextRule { field: "state", label: "State", min: 0, max: 50 };
const POSTAL_CODE: TextRule =
  TextRule { field: "postal_code", label: "Postal code", min: 0, max: 10 };
const COUNTRY: TextRule =
  TextRule { field: "country", label: "Country", min: 0, max: 50 };

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

// ─── Checker ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Checks {
  errors: Vec<FieldError>,
}

impl Checks {
  fn fail(&mut self, field: &str, message: impl Into<String>) {
    self.errors.push(FieldError::new(field, message));
  }

  /// Trim `value`; a blank value counts as absent.
  fn present(value: Option<String>) -> Option<String> {
    value
      .map(|v| v.trim().to_owned())
      .filter(|v| !v.is_empty())
  }

  fn required(
    &mut self,
    field: &str,
    label: &str,
    value: Option<String>,
    presence: Presence,
  ) -> Option<String> {
    let value = Self::present(value);
    if value.is_none() && presence == Presence::Required {
      self.fail(field, format!("{label} is required"));
    }
    value
  }

  fn text(
    &mut self,
    rule: &TextRule,
    value: Option<String>,
    presence: Presence,
  ) -> Option<String> {
    let value = self.required(rule.field, rule.label, value, presence)?;
    let len = value.chars().count();
    if len < rule.min || len > rule.max {
      let message = if rule.min > 0 {
        format!(
          "{} must be between {} and {} characters",
          rule.label, rule.min, rule.max
        )
      } else {
        format!("{} must be less than {} characters", rule.label, rule.max)
      };
      self.fail(rule.field, message);
      return None;
    }
    Some(value)
  }

  fn email(&mut self, value: Option<String>, presence: Presence) -> Option<String> {
    let value = self.required("email", "Email", value, presence)?;
    if !value.validate_email() {
      self.fail("email", "Must be a valid email address");
      return None;
    }
    Some(value.to_lowercase())
  }

  fn phone(&mut self, value: Option<String>) -> Option<String> {
    let value = Self::present(value)?;
    let digits_only = value.chars().all(|c| c.is_ascii_digit());
    if !digits_only || !PHONE_DIGITS.contains(&value.len()) {
      self.fail("phone", "Phone must be 10-15 digits");
      return None;
    }
    Some(value)
  }

  fn date_of_birth(
    &mut self,
    value: Option<String>,
    presence: Presence,
  ) -> Option<NaiveDate> {
    let value =
      self.required("date_of_birth", "Date of birth", value, presence)?;
    match parse_date(&value) {
      Ok(d) => Some(d),
      Err(_) => {
        self.fail("date_of_birth", "Must be a valid date (YYYY-MM-DD)");
        None
      }
    }
  }

  fn status(&mut self, value: Option<String>) -> Option<StudentStatus> {
    let value = Self::present(value)?;
    match StudentStatus::parse(&value) {
      Ok(s) => Some(s),
      Err(_) => {
        self.fail(
          "status",
          format!(
            "Status must be one of: {}",
            StudentStatus::names().join(", ")
          ),
        );
        None
      }
    }
  }

  fn id(&mut self, raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
      Ok(id) if id >= 1 => Some(id),
      _ => {
        self.fail("id", "Student ID must be a positive integer");
        None
      }
    }
  }

  fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
    if self.errors.is_empty() { Ok(value) } else { Err(self.errors) }
  }
}

/// Every field of a body after its checks have run.
struct Checked {
  first_name:    Option<String>,
  last_name:     Option<String>,
  email:         Option<String>,
  phone:         Option<String>,
  date_of_birth: Option<NaiveDate>,
  address:       Option<String>,
  city:          Option<String>,
  state:         Option<String>,
  postal_code:   Option<String>,
  country:       Option<String>,
  status:        Option<StudentStatus>,
}

fn check_body(checks: &mut Checks, body: StudentBody, presence: Presence) -> Checked {
  Checked {
    first_name:    checks.text(&FIRST_NAME, body.first_name, presence),
    last_name:     checks.text(&LAST_NAME, body.last_name, presence),
    email:         checks.email(body.email, presence),
    phone:         checks.phone(body.phone),
    date_of_birth: checks.date_of_birth(body.date_of_birth, presence),
    address:       checks.text(&ADDRESS, body.address, Presence::Optional),
    city:          checks.text(&CITY, body.city, Presence::Optional),
    state:         checks.text(&STATE, body.state, Presence::Optional),
    postal_code:   checks.text(&POSTAL_CODE, body.postal_code, Presence::Optional),
    country:       checks.text(&COUNTRY, body.country, Presence::Optional),
    status:        checks.status(body.status),
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate a create body.
pub fn new_student(body: StudentBody) -> Result<NewStudent, Vec<FieldError>> {
  let mut checks = Checks::default();
  let c = check_body(&mut checks, body, Presence::Required);

  let (Some(first_name), Some(last_name), Some(email), Some(date_of_birth)) =
    (c.first_name, c.last_name, c.email, c.date_of_birth)
  else {
    // A missing required field has always recorded an error.
    return Err(checks.errors);
  };

  checks.finish(NewStudent {
    first_name,
    last_name,
    email,
    phone: c.phone,
    date_of_birth,
    address: c.address,
    city: c.city,
    state: c.state,
    postal_code: c.postal_code,
    country: c.country,
    status: c.status,
  })
}

/// Validate a path id and a partial-update body together.
pub fn student_patch(
  raw_id: &str,
  body: StudentBody,
) -> Result<(i64, StudentPatch), Vec<FieldError>> {
  let mut checks = Checks::default();
  let id = checks.id(raw_id);
  let c = check_body(&mut checks, body, Presence::Optional);

  let patch = StudentPatch {
    first_name:    c.first_name,
    last_name:     c.last_name,
    email:         c.email,
    phone:         c.phone,
    date_of_birth: c.date_of_birth,
    address:       c.address,
    city:          c.city,
    state:         c.state,
    postal_code:   c.postal_code,
    country:       c.country,
    status:        c.status,
  };

  match id {
    Some(id) => checks.finish((id, patch)),
    None => Err(checks.errors),
  }
}

/// Validate a bare path id.
pub fn student_id(raw_id: &str) -> Result<i64, Vec<FieldError>> {
  let mut checks = Checks::default();
  match checks.id(raw_id) {
    Some(id) => Ok(id),
    None => Err(checks.errors),
  }
}

/// Resolve `page`/`limit`, defaulting values that are absent or not numbers.
/// `None` means the numbers given are out of range.
pub fn page_request(params: &PageParams) -> Option<PageRequest> {
  fn number(raw: Option<&str>, default: u64) -> i64 {
    raw
      .and_then(|s| s.trim().parse::<i64>().ok())
      .unwrap_or(default as i64)
  }
  PageRequest::new(
    number(params.page.as_deref(), DEFAULT_PAGE),
    number(params.limit.as_deref(), DEFAULT_LIMIT),
  )
}
