use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Value stored for a field the extractor could not locate.
pub const NOT_FOUND: &str = "Non trouvé";

/// Change-flag value meaning "not replaced".
pub const FLAG_NO: &str = "Non";

/// Change-flag value meaning "replaced".
pub const FLAG_YES: &str = "Oui";

/// A closed vocabulary of field names for one document type.
pub trait FieldName: Copy + Eq + Hash + 'static {
    /// The label as printed on the source document.
    fn label(&self) -> &'static str;

    /// Every field of the vocabulary, in extraction order.
    fn all() -> &'static [Self];
}

/// Fields of the primary verification report ("rapport de vérification").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportField {
    Comment,
    DefibrillatorSerial,
    ReportDateTime,
    BatteryChanged,
    AdultElectrodesChanged,
    PediatricElectrodesChanged,
    SiteCode,
    BatterySerial,
    BatteryInstallDate,
    BatteryLevel,
    NewBatterySerial,
    NewBatteryInstallDate,
    NewBatteryLevel,
    AdultElectrodesSerial,
    AdultElectrodesSerialRead,
    SerialRead2,
    DefibrillatorFabricationDate,
    BatteryFabricationDate,
    FabricationDateRead,
    NewBatteryFabricationDate,
    AdultElectrodesExpiry,
    AdultElectrodesExpiryRead,
    NewElectrodesSerial,
    NewElectrodesExpiry,
    NewPediatricElectrodesSerial,
    NewPediatricElectrodesExpiry,
}

impl FieldName for ReportField {
    fn label(&self) -> &'static str {
        match self {
            ReportField::Comment => "Commentaire fin d'intervention et recommandations",
            ReportField::DefibrillatorSerial => "Numéro de série DEFIBRILLATEUR",
            ReportField::ReportDateTime => "Date-Heure rapport vérification défibrillateur",
            ReportField::BatteryChanged => "Changement batterie",
            ReportField::AdultElectrodesChanged => "Changement électrodes adultes",
            ReportField::PediatricElectrodesChanged => "Changement électrodes pédiatriques",
            ReportField::SiteCode => "Code site",
            ReportField::BatterySerial => "Numéro de série Batterie",
            ReportField::BatteryInstallDate => "Date mise en service BATTERIE",
            ReportField::BatteryLevel => "Niveau de charge de la batterie en %",
            ReportField::NewBatterySerial => "N° série nouvelle batterie",
            ReportField::NewBatteryInstallDate => "Date mise en service",
            ReportField::NewBatteryLevel => "Niveau de charge nouvelle batterie",
            ReportField::AdultElectrodesSerial => "Numéro de série ELECTRODES ADULTES",
            ReportField::AdultElectrodesSerialRead => "Numéro de série ELECTRODES ADULTES relevé",
            ReportField::SerialRead2 => "Numéro de série relevé 2",
            ReportField::DefibrillatorFabricationDate => "Date fabrication DEFIBRILLATEUR",
            ReportField::BatteryFabricationDate => "Date fabrication BATTERIE",
            ReportField::FabricationDateRead => "Date fabrication relevée",
            ReportField::NewBatteryFabricationDate => "Date fabrication nouvelle batterie",
            ReportField::AdultElectrodesExpiry => "Date de péremption ELECTRODES ADULTES",
            ReportField::AdultElectrodesExpiryRead => "Date de péremption ELECTRODES ADULTES relevée",
            ReportField::NewElectrodesSerial => "N° série nouvelles électrodes",
            ReportField::NewElectrodesExpiry => "Date péremption des nouvelles éléctrodes",
            ReportField::NewPediatricElectrodesSerial => "N° série nouvelles électrodes pédiatriques",
            ReportField::NewPediatricElectrodesExpiry => {
                "Date péremption des nouvelles éléctrodes pédiatriques"
            }
        }
    }

    fn all() -> &'static [Self] {
        use ReportField::*;
        &[
            Comment,
            DefibrillatorSerial,
            ReportDateTime,
            BatteryChanged,
            AdultElectrodesChanged,
            PediatricElectrodesChanged,
            SiteCode,
            BatterySerial,
            BatteryInstallDate,
            BatteryLevel,
            NewBatterySerial,
            NewBatteryInstallDate,
            NewBatteryLevel,
            AdultElectrodesSerial,
            AdultElectrodesSerialRead,
            SerialRead2,
            DefibrillatorFabricationDate,
            BatteryFabricationDate,
            FabricationDateRead,
            NewBatteryFabricationDate,
            AdultElectrodesExpiry,
            AdultElectrodesExpiryRead,
            NewElectrodesSerial,
            NewElectrodesExpiry,
            NewPediatricElectrodesSerial,
            NewPediatricElectrodesExpiry,
        ]
    }
}

impl ReportField {
    pub fn is_serial(&self) -> bool {
        let label = self.label().to_lowercase();
        label.contains("n° série") || label.contains("numéro de série")
    }

    pub fn is_date(&self) -> bool {
        self.label().to_lowercase().contains("date")
    }

    pub fn is_percentage(&self) -> bool {
        self.label().contains('%')
    }
}

/// Fields of the AED device report, both layouts.
///
/// G5 reports carry the first five fields, G3 reports the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AedField {
    G5Serial,
    G5BatteryRemaining,
    G5BatteryInstallDate,
    G5CurrentErrors,
    G5DateTime,
    G3Serial,
    G3LastFailure,
    G3LotNumber,
    G3CommissioningDate,
    G3BatteryInstallDate,
    G3BatteryInitialCapacity,
    G3BatteryRemaining,
    G3SelfTest,
}

impl FieldName for AedField {
    fn label(&self) -> &'static str {
        match self {
            AedField::G5Serial => "N° série DAE",
            AedField::G5BatteryRemaining => "Capacité restante de la batterie",
            AedField::G5BatteryInstallDate => "Date d'installation :",
            AedField::G5CurrentErrors => "Rapport DAE - Erreurs en cours",
            AedField::G5DateTime => "Date / Heure:",
            AedField::G3Serial => "Série DSA",
            AedField::G3LastFailure => "Dernier échec de DSA",
            AedField::G3LotNumber => "Numéro de lot",
            AedField::G3CommissioningDate => "Date de mise en service",
            AedField::G3BatteryInstallDate => "Date de mise en service batterie",
            AedField::G3BatteryInitialCapacity => "Capacité initiale de la batterie 12V",
            AedField::G3BatteryRemaining => "Capacité restante de la batterie 12V",
            AedField::G3SelfTest => "Autotest",
        }
    }

    fn all() -> &'static [Self] {
        use AedField::*;
        &[
            G5Serial,
            G5BatteryRemaining,
            G5BatteryInstallDate,
            G5CurrentErrors,
            G5DateTime,
            G3Serial,
            G3LastFailure,
            G3LotNumber,
            G3CommissioningDate,
            G3BatteryInstallDate,
            G3BatteryInitialCapacity,
            G3BatteryRemaining,
            G3SelfTest,
        ]
    }
}

/// Raw extracted values of one document, keyed by a closed field vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord<F: FieldName> {
    values: HashMap<F, String>,
}

impl<F: FieldName> Default for FieldRecord<F> {
    fn default() -> Self {
        FieldRecord {
            values: HashMap::new(),
        }
    }
}

impl<F: FieldName> FieldRecord<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: F, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn with(mut self, field: F, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Raw value, or [`NOT_FOUND`] when the field was never extracted.
    pub fn get(&self, field: F) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or(NOT_FOUND)
    }

    pub fn contains(&self, field: F) -> bool {
        self.values.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Label-keyed view, for display and export.
    pub fn to_label_map(&self) -> BTreeMap<&'static str, &str> {
        F::all()
            .iter()
            .filter_map(|field| {
                self.values
                    .get(field)
                    .map(|value| (field.label(), value.as_str()))
            })
            .collect()
    }
}
