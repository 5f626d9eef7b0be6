// ============================================================================
// Structure : DailyRecord
// ============================================================================
// Un jour normalisé : date, 8 scores de catégorie, total du tableur,
// et les 4 champs "prix" synthétisés pour le graphique en chandeliers.
//
// CONCEPTS RUST :
// 1. Enum exhaustif pour les catégories (le compilateur vérifie les match)
// 2. #[serde(rename_all = "camelCase")] : JSON compatible dashboard web
// 3. NaN est sérialisé en `null` par serde_json
// ============================================================================

use serde::Serialize;

/// Les huit dimensions de vie suivies dans le tableur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    PersonalWellBeing,
    Relationships,
    WorkCareer,
    HealthFitness,
    HobbiesInterests,
    PersonalFinance,
    LearningGrowth,
    HomeEnvironment,
}

impl Category {
    /// Toutes les catégories, dans l'ordre des colonnes du tableur
    pub const ALL: [Category; 8] = [
        Category::PersonalWellBeing,
        Category::Relationships,
        Category::WorkCareer,
        Category::HealthFitness,
        Category::HobbiesInterests,
        Category::PersonalFinance,
        Category::LearningGrowth,
        Category::HomeEnvironment,
    ];

    /// Libellé exact de la colonne dans le tableur
    pub fn label(&self) -> &'static str {
        match self {
            Category::PersonalWellBeing => "Personal Well-being",
            Category::Relationships => "Relationships",
            Category::WorkCareer => "Work/Career",
            Category::HealthFitness => "Health & Fitness",
            Category::HobbiesInterests => "Hobbies & Interests",
            Category::PersonalFinance => "Personal Finance",
            Category::LearningGrowth => "Learning & Growth",
            Category::HomeEnvironment => "Home & Environment",
        }
    }

    /// Libellé court pour les en-têtes de tableau
    pub fn short_label(&self) -> &'static str {
        match self {
            Category::PersonalWellBeing => "Personal",
            Category::Relationships => "Relationships",
            Category::WorkCareer => "Work",
            Category::HealthFitness => "Health",
            Category::HobbiesInterests => "Hobbies",
            Category::PersonalFinance => "Finance",
            Category::LearningGrowth => "Learning",
            Category::HomeEnvironment => "Home",
        }
    }
}

/// Un enregistrement journalier normalisé
///
/// Invariants (garantis par le synthétiseur) :
/// - close == daily_total
/// - open == close du jour précédent (ou daily_total pour le premier)
/// - high / low = max / min des 9 champs numériques
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Date ISO `YYYY-MM-DD`, ou le texte brut si illisible
    pub date: String,

    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,

    pub personal_well_being: f64,
    pub relationships: f64,
    pub work_career: f64,
    pub health_fitness: f64,
    pub hobbies_interests: f64,
    pub personal_finance: f64,
    pub learning_growth: f64,
    pub home_environment: f64,

    /// Total du tableur (fait autorité, jamais recalculé)
    pub daily_total: f64,
}

impl DailyRecord {
    /// Score d'une catégorie
    pub fn score(&self, category: Category) -> f64 {
        match category {
            Category::PersonalWellBeing => self.personal_well_being,
            Category::Relationships => self.relationships,
            Category::WorkCareer => self.work_career,
            Category::HealthFitness => self.health_fitness,
            Category::HobbiesInterests => self.hobbies_interests,
            Category::PersonalFinance => self.personal_finance,
            Category::LearningGrowth => self.learning_growth,
            Category::HomeEnvironment => self.home_environment,
        }
    }

    /// Les 9 champs numériques : 8 catégories puis le total
    pub fn numeric_fields(&self) -> [f64; 9] {
        [
            self.personal_well_being,
            self.relationships,
            self.work_career,
            self.health_fitness,
            self.hobbies_interests,
            self.personal_finance,
            self.learning_growth,
            self.home_environment,
            self.daily_total,
        ]
    }

    /// Journée "haussière" (égalité comptée comme hausse)
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}
