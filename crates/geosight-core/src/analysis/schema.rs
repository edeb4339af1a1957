//! Structured output schema sent with every analysis request.
//!
//! Gemini generates properties in `propertyOrdering` order. The reasoning
//! fields (`thoughtProcess`, `visualCues`) must come before every conclusion
//! field so the trace is produced ahead of the answer. Both the `properties`
//! map and `propertyOrdering` are derived from [`ResultField::ORDERED`].

use indexmap::IndexMap;
use serde::Serialize;

/// Schema node types understood by the Gemini API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    String,
    Number,
    Array,
}

/// A (subset of an) OpenAPI schema node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
}

impl Schema {
    fn leaf(schema_type: SchemaType, description: &str) -> Self {
        Self {
            schema_type,
            description: Some(description.to_string()),
            items: None,
            properties: IndexMap::new(),
            required: Vec::new(),
            property_ordering: Vec::new(),
        }
    }

    fn array_of(items: Schema, description: &str) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::leaf(SchemaType::Array, description)
        }
    }
}

/// Fields of the model's answer, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultField {
    ThoughtProcess,
    VisualCues,
    Country,
    Region,
    Latitude,
    Longitude,
    Explanation,
    Confidence,
}

impl ResultField {
    /// Generation order. Reasoning first, conclusions after.
    pub const ORDERED: [ResultField; 8] = [
        ResultField::ThoughtProcess,
        ResultField::VisualCues,
        ResultField::Country,
        ResultField::Region,
        ResultField::Latitude,
        ResultField::Longitude,
        ResultField::Explanation,
        ResultField::Confidence,
    ];

    /// Wire name, matching the serde name on `AnalysisResult`.
    pub fn name(self) -> &'static str {
        match self {
            ResultField::ThoughtProcess => "thoughtProcess",
            ResultField::VisualCues => "visualCues",
            ResultField::Country => "country",
            ResultField::Region => "region",
            ResultField::Latitude => "latitude",
            ResultField::Longitude => "longitude",
            ResultField::Explanation => "explanation",
            ResultField::Confidence => "confidence",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, ResultField::Region)
    }

    /// Fields that make up the reasoning trace rather than the answer.
    pub fn is_reasoning(self) -> bool {
        matches!(self, ResultField::ThoughtProcess | ResultField::VisualCues)
    }

    fn schema(self) -> Schema {
        match self {
            ResultField::ThoughtProcess => Schema::leaf(
                SchemaType::String,
                "The raw step-by-step analysis. Describe what you see, what you ruled out, \
                 and how you narrowed down the location before deciding.",
            ),
            ResultField::VisualCues => Schema::array_of(
                Schema {
                    description: None,
                    ..Schema::leaf(SchemaType::String, "")
                },
                "Specific visual clues found (for example 'yellow license plates', 'eucalyptus trees').",
            ),
            ResultField::Country => Schema::leaf(SchemaType::String, "Country name"),
            ResultField::Region => {
                Schema::leaf(SchemaType::String, "State, province or region name")
            }
            ResultField::Latitude => Schema::leaf(SchemaType::Number, "Estimated latitude"),
            ResultField::Longitude => Schema::leaf(SchemaType::Number, "Estimated longitude"),
            ResultField::Explanation => Schema::leaf(
                SchemaType::String,
                "Polished summary of the final conclusion and the key reasoning.",
            ),
            ResultField::Confidence => {
                Schema::leaf(SchemaType::Number, "Confidence score (0-100)")
            }
        }
    }
}

/// Build the response schema for an analysis request.
pub fn response_schema() -> Schema {
    let properties = ResultField::ORDERED
        .iter()
        .map(|field| (field.name().to_string(), field.schema()))
        .collect();
    let required = ResultField::ORDERED
        .iter()
        .filter(|field| field.is_required())
        .map(|field| field.name().to_string())
        .collect();
    let property_ordering = ResultField::ORDERED
        .iter()
        .map(|field| field.name().to_string())
        .collect();

    Schema {
        schema_type: SchemaType::Object,
        description: None,
        items: None,
        properties,
        required,
        property_ordering,
    }
}
