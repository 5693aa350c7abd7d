mod billing;
mod cart;
mod checkout;
mod helpers;
