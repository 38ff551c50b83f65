//! Attribute descriptions returned by the `get_schema` protocol method.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    String,
    Number,
    Map,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: AttrType,
    pub required: bool,
    pub computed: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub type_name: &'static str,
    pub data_source: Vec<Attribute>,
    pub resource: Vec<Attribute>,
}

const fn input(name: &'static str, ty: AttrType, description: &'static str) -> Attribute {
    Attribute {
        name,
        ty,
        required: false,
        computed: false,
        description,
    }
}

const fn computed(name: &'static str, ty: AttrType, description: &'static str) -> Attribute {
    Attribute {
        name,
        ty,
        required: false,
        computed: true,
        description,
    }
}

const URL: Attribute = Attribute {
    name: "url",
    ty: AttrType::String,
    required: true,
    computed: false,
    description: "The URL for the request. Supported schemes are `http` and `https`.",
};

const SHARED: [Attribute; 8] = [
    URL,
    input(
        "request_headers",
        AttrType::Map,
        "A map of request header field names and values.",
    ),
    input(
        "initial_interval",
        AttrType::Number,
        "Initial wait between attempts, in milliseconds. Defaults to 500.",
    ),
    input(
        "max_elapsed_time",
        AttrType::Number,
        "Give up once this many seconds have passed since the first attempt. Defaults to 900.",
    ),
    input(
        "max_interval",
        AttrType::Number,
        "Upper bound on a single wait, in milliseconds. Defaults to 60000.",
    ),
    input(
        "randomization_factor",
        AttrType::String,
        "Jitter applied to each wait, as a decimal in [0, 1). Defaults to \"0.5\".",
    ),
    input(
        "multiplier",
        AttrType::String,
        "Growth factor of the wait after each failure, as a decimal >= 1. Defaults to \"1.5\".",
    ),
    input(
        "no_retry",
        AttrType::Bool,
        "Give up after the first failed attempt. Defaults to false.",
    ),
];

pub fn schema() -> Schema {
    let mut data_source = SHARED.to_vec();
    data_source.extend([
        computed("id", AttrType::String, "The URL used for the request."),
        computed(
            "response_body",
            AttrType::String,
            "The response body returned as a string.",
        ),
        computed(
            "response_headers",
            AttrType::Map,
            "Response headers; repeated headers are joined with \", \".",
        ),
        computed(
            "status_code",
            AttrType::Number,
            "The HTTP response status code.",
        ),
    ]);

    let mut resource = SHARED.to_vec();
    resource.push(computed("id", AttrType::String, "The URL used for the request."));

    Schema {
        type_name: super::TYPE_NAME,
        data_source,
        resource,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_url_is_required() {
        let s = schema();
        let required: Vec<_> = s
            .data_source
            .iter()
            .chain(&s.resource)
            .filter(|a| a.required)
            .map(|a| a.name)
            .collect();
        assert_eq!(required, ["url", "url"]);
    }

    #[test]
    fn data_source_exports_response_fields() {
        let names: Vec<_> = schema().data_source.iter().map(|a| a.name).collect();
        for n in ["response_body", "response_headers", "status_code", "id"] {
            assert!(names.contains(&n), "{n}");
        }
        let resource: Vec<_> = schema().resource.iter().map(|a| a.name).collect();
        assert!(!resource.contains(&"response_body"));
    }

    #[test]
    fn every_backoff_field_is_described() {
        let s = schema();
        for attrs in [&s.data_source, &s.resource] {
            let names: Vec<_> = attrs.iter().map(|a| a.name).collect();
            for n in [
                "initial_interval",
                "max_elapsed_time",
                "max_interval",
                "randomization_factor",
                "multiplier",
                "no_retry",
            ] {
                assert!(names.contains(&n), "{n}");
            }
        }
        let no_retry = s.resource.iter().find(|a| a.name == "no_retry").unwrap();
        assert_eq!(no_retry.ty, AttrType::Bool);
        assert!(!no_retry.required);
    }

    #[test]
    fn serializes_type_field() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json["type_name"], "http-wait");
        assert_eq!(json["data_source"][0]["type"], "string");
    }
}
