mod annotations;
mod model;
mod reachability;
