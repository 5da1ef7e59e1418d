use serde::Deserialize;

/// Wire format of the routing service response. Only the fields on the
/// path to the route duration are modelled; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct DirectionResponse {
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<DirectionResult>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionResult {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub scheme: Vec<Scheme>,
}

#[derive(Debug, Deserialize)]
pub struct Scheme {
    /// Transit duration in seconds.
    pub duration: u64,
}
