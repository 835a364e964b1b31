pub mod ranked_output_adapter;
