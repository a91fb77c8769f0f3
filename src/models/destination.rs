use serde::{Deserialize, Serialize};

pub type DestinationId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

impl Destination {
    pub fn has_details(&self) -> bool {
        !self.description.is_empty() || !self.pictures.is_empty()
    }
}

pub fn find_by_id<'a>(destinations: &'a [Destination], id: &str) -> Option<&'a Destination> {
    destinations.iter().find(|destination| destination.id == id)
}

pub fn find_by_name<'a>(destinations: &'a [Destination], name: &str) -> Option<&'a Destination> {
    let name = name.trim();
    destinations.iter().find(|destination| destination.name == name)
}
