mod amortization;
mod common;
