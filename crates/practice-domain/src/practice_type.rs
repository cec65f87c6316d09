use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tipo de práctica elegido en el primer paso de la inscripción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PracticeType {
  /// Iniciar una práctica en una empresa o institución.
  #[serde(rename = "iniciar")]
  Start,
  /// Convalidar trabajo previo como práctica.
  #[serde(rename = "convalidar")]
  Validate,
}

impl PracticeType {
  pub fn as_str(&self) -> &'static str {
    match self {
      PracticeType::Start => "iniciar",
      PracticeType::Validate => "convalidar",
    }
  }

  /// Categorías que se ofrecen para este tipo de práctica, en el orden en
  /// que aparecen en el formulario.
  pub fn allowed_categories(&self) -> &'static [Category] {
    match self {
      PracticeType::Start => &[Category::Company, Category::Research],
      PracticeType::Validate => &[Category::CompanyOrInstitution,
                                  Category::Research,
                                  Category::SocialWork,
                                  Category::Entrepreneurship],
    }
  }

  pub fn allows(&self, category: Category) -> bool {
    self.allowed_categories().contains(&category)
  }
}

impl fmt::Display for PracticeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for PracticeType {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "iniciar" | "start" => Ok(PracticeType::Start),
      "convalidar" | "validate" => Ok(PracticeType::Validate),
      other => Err(DomainError::ValidationError(format!("tipo de práctica desconocido: {}", other))),
    }
  }
}

/// Categoría de la práctica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  #[serde(rename = "empresa")]
  Company,
  #[serde(rename = "investigativa")]
  Research,
  #[serde(rename = "empresa_o_institucion")]
  CompanyOrInstitution,
  #[serde(rename = "trabajo_social")]
  SocialWork,
  #[serde(rename = "emprendimiento")]
  Entrepreneurship,
}

impl Category {
  pub const ALL: [Category; 5] = [Category::Company,
                                  Category::Research,
                                  Category::CompanyOrInstitution,
                                  Category::SocialWork,
                                  Category::Entrepreneurship];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Company => "empresa",
      Category::Research => "investigativa",
      Category::CompanyOrInstitution => "empresa_o_institucion",
      Category::SocialWork => "trabajo_social",
      Category::Entrepreneurship => "emprendimiento",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Category {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let needle = s.trim().to_lowercase();
    Category::ALL.iter()
                 .copied()
                 .find(|c| c.as_str() == needle)
                 .ok_or_else(|| DomainError::ValidationError(format!("categoría desconocida: {}", s)))
  }
}

/// Modo de práctica: total de horas que deben cumplirse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PracticeMode {
  Hours162,
  Hours324,
}

impl PracticeMode {
  pub fn hours(&self) -> u32 {
    match self {
      PracticeMode::Hours162 => 162,
      PracticeMode::Hours324 => 324,
    }
  }
}

impl Default for PracticeMode {
  fn default() -> Self {
    PracticeMode::Hours324
  }
}

impl TryFrom<u32> for PracticeMode {
  type Error = DomainError;

  fn try_from(hours: u32) -> Result<Self, Self::Error> {
    match hours {
      162 => Ok(PracticeMode::Hours162),
      324 => Ok(PracticeMode::Hours324),
      other => Err(DomainError::InvalidFormat { field: "total_hours".into(),
                                                reason: format!("{} no es un modo válido (162 o 324)", other) }),
    }
  }
}

impl From<PracticeMode> for u32 {
  fn from(mode: PracticeMode) -> Self {
    mode.hours()
  }
}

impl FromStr for PracticeMode {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    let hours = digits.parse::<u32>()
                      .map_err(|_| DomainError::InvalidFormat { field: "total_hours".into(),
                                                                reason: format!("'{}' no es un número de horas", s) })?;
    PracticeMode::try_from(hours)
  }
}
