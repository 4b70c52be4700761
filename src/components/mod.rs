pub mod energy_flow;
