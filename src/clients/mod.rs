pub mod randomuser;
