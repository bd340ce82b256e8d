mod appearance;
mod attach_gate;
mod close_gate;
mod create_gate;
mod links;
mod next_link;
mod open_gate;
mod options;
mod registry;
