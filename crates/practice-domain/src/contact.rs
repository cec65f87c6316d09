use serde::{Deserialize, Serialize};

/// Datos de la empresa. Todos opcionales hasta que la práctica se confirma.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
  pub name: Option<String>,
  pub address: Option<String>,
  /// RUT de la empresa.
  pub tax_id: Option<String>,
}

/// Persona de contacto en la empresa que confirma y evalúa al alumno.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorInfo {
  pub name: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
}

/// Datos confirmados por el colaborador externo al aprobar la inscripción.
/// Los campos `None` conservan lo declarado por el alumno.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationDetails {
  pub company: CompanyInfo,
  pub supervisor: SupervisorInfo,
}

impl CompanyInfo {
  pub(crate) fn merge(&mut self, confirmed: &CompanyInfo) {
    merge_field(&mut self.name, &confirmed.name);
    merge_field(&mut self.address, &confirmed.address);
    merge_field(&mut self.tax_id, &confirmed.tax_id);
  }
}

impl SupervisorInfo {
  pub(crate) fn merge(&mut self, confirmed: &SupervisorInfo) {
    merge_field(&mut self.name, &confirmed.name);
    merge_field(&mut self.email, &confirmed.email);
    merge_field(&mut self.phone, &confirmed.phone);
  }
}

fn merge_field(target: &mut Option<String>, confirmed: &Option<String>) {
  if let Some(v) = confirmed {
    *target = Some(v.clone());
  }
}
