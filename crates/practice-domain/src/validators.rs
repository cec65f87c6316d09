// validators.rs
//
// Reglas de formato para los datos de inscripción: RUT chileno con dígito
// verificador, e-mail y teléfono. También el recorte por caracteres que
// replica los `maxLength` del formulario.
use crate::DomainError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$"));

/// Recorta `value` a `max` caracteres (no bytes). Devuelve el texto tal cual
/// si ya cabe.
pub fn truncate_chars(value: &str, max: usize) -> String {
  match value.char_indices().nth(max) {
    Some((idx, _)) => value[..idx].to_string(),
    None => value.to_string(),
  }
}

pub fn char_len(value: &str) -> usize {
  value.chars().count()
}

pub fn is_blank(value: Option<&str>) -> bool {
  value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Calcula el dígito verificador (módulo 11) de la parte numérica de un RUT.
pub fn rut_check_digit(body: &str) -> Result<char, DomainError> {
  if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
    return Err(invalid("rut", "la parte numérica sólo puede contener dígitos"));
  }
  let mut sum = 0u32;
  for (i, c) in body.chars().rev().enumerate() {
    let digit = c.to_digit(10).unwrap_or(0);
    sum += digit * (2 + (i as u32 % 6));
  }
  Ok(match 11 - (sum % 11) {
    11 => '0',
    10 => 'K',
    n => char::from_digit(n, 10).unwrap_or('0'),
  })
}

/// Valida un RUT y lo devuelve normalizado como `12.345.678-5`. Acepta
/// puntos, espacios y el dígito verificador con o sin guion.
pub fn normalize_rut(raw: &str) -> Result<String, DomainError> {
  let compact: String = raw.chars()
                           .filter(|c| !matches!(c, '.' | ' ' | '-'))
                           .map(|c| c.to_ascii_uppercase())
                           .collect();
  if let Some(bad) = compact.chars().find(|c| !c.is_ascii_digit() && *c != 'K') {
    return Err(invalid("rut", &format!("carácter no permitido '{}'", bad)));
  }
  // Desde aquí `compact` es ASCII: los índices por byte coinciden con caracteres.
  let Some(given) = compact.chars().last() else {
    return Err(invalid("rut", "RUT vacío"));
  };
  let body = compact[..compact.len() - given.len_utf8()].trim_start_matches('0');
  if body.is_empty() {
    return Err(invalid("rut", "falta la parte numérica"));
  }
  if body.chars().count() > 8 {
    return Err(invalid("rut", "RUT demasiado largo"));
  }
  let expected = rut_check_digit(body)?;
  if given != expected {
    return Err(invalid("rut", &format!("dígito verificador incorrecto (esperado {})", expected)));
  }
  Ok(format!("{}-{}", group_thousands(body), expected))
}

pub fn validate_email(raw: &str) -> Result<(), DomainError> {
  let re = EMAIL_RE.as_ref()
                   .map_err(|e| DomainError::ValidationError(format!("patrón de e-mail inválido: {}", e)))?;
  if re.is_match(raw.trim()) {
    Ok(())
  } else {
    Err(invalid("supervisor_email", "no parece una dirección de e-mail"))
  }
}

/// Teléfono con `+` opcional y entre 8 y 11 dígitos (se ignoran espacios y
/// guiones).
pub fn validate_phone(raw: &str) -> Result<(), DomainError> {
  let compact: String = raw.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
  let digits = compact.strip_prefix('+').unwrap_or(&compact);
  if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
    return Err(invalid("supervisor_phone", "sólo se permiten dígitos y un '+' inicial"));
  }
  if !(8..=11).contains(&digits.len()) {
    return Err(invalid("supervisor_phone", "debe tener entre 8 y 11 dígitos"));
  }
  Ok(())
}

fn group_thousands(digits: &str) -> String {
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push('.');
    }
    out.push(c);
  }
  out
}

fn invalid(field: &str, reason: &str) -> DomainError {
  DomainError::InvalidFormat { field: field.to_string(), reason: reason.to_string() }
}
